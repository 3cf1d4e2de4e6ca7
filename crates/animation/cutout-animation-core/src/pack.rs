#![allow(dead_code)]
//! Unit packs: JSON bundles carrying the raw table text for each form.
//!
//! A pack is either a map of forms (`{"forms": {"first": {...}, ...}}`) or
//! a single bare form object. Each form carries its cut, model and
//! animation tables verbatim; parsing the wrapper parses the tables too,
//! so a loaded pack is ready to arrange.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::data::{Animation, CutTable, Skeleton};
use crate::puppet::{AnimKind, Puppet};
use crate::render::SpriteImage;
use crate::tables::ParseError;

#[derive(Debug, Clone, Default, Deserialize)]
struct RawForm {
    #[serde(default)]
    imgcut: Option<String>,
    #[serde(default)]
    mamodel: Option<String>,
    #[serde(default)]
    maanim: Vec<String>,
    /// First-generation packs stored the scale multiplier under the plain
    /// scale id.
    #[serde(default)]
    legacy: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawPack {
    Multi { forms: BTreeMap<String, RawForm> },
    Single(RawForm),
}

/// Parsed tables for one form, ready to slice and arrange.
#[derive(Debug, Clone, Default)]
pub struct FormTables {
    pub cut: CutTable,
    pub skeleton: Skeleton,
    pub anims: Vec<Animation>,
}

impl FormTables {
    /// Assemble form tables from raw table text. Absent tables take their
    /// defaults (empty cut list, the stand-in rig, empty animations);
    /// `legacy` selects the first-generation animation decoding.
    pub fn load(
        imgcut: Option<&str>,
        mamodel: Option<&str>,
        maanims: &[&str],
        legacy: bool,
    ) -> Result<FormTables, ParseError> {
        let cut = match imgcut {
            Some(text) => CutTable::parse(text)?,
            None => CutTable::default(),
        };
        let skeleton = match mamodel {
            Some(text) => Skeleton::parse(text)?,
            None => Skeleton::default(),
        };
        let mut anims = Vec::with_capacity(AnimKind::ALL.len());
        for text in maanims {
            anims.push(if legacy {
                Animation::parse_legacy(text)?
            } else {
                Animation::parse(text)?
            });
        }
        anims.resize_with(AnimKind::ALL.len(), Animation::default);
        Ok(FormTables {
            cut,
            skeleton,
            anims,
        })
    }

    fn build(raw: &RawForm) -> Result<FormTables, ParseError> {
        let maanims: Vec<&str> = raw.maanim.iter().map(String::as_str).collect();
        Self::load(
            raw.imgcut.as_deref(),
            raw.mamodel.as_deref(),
            &maanims,
            raw.legacy,
        )
    }

    /// Slice the sheet and assemble a puppet for this form.
    pub fn puppet<I: SpriteImage>(&self, sheet: &I) -> Puppet<I> {
        Puppet::new(
            Arc::new(self.skeleton.clone()),
            self.cut.slice(sheet),
            self.anims.clone(),
        )
    }
}

/// A parsed unit pack: every form's tables, keyed by form id. Single-form
/// packs store their form under `""`.
#[derive(Debug, Clone)]
pub struct UnitPack {
    forms: BTreeMap<String, FormTables>,
}

impl UnitPack {
    pub fn parse(json: &str) -> Result<UnitPack, ParseError> {
        let raw: RawPack = serde_json::from_str(json)?;
        let mut forms = BTreeMap::new();
        match raw {
            RawPack::Multi { forms: raw_forms } => {
                for (name, raw) in &raw_forms {
                    forms.insert(name.clone(), FormTables::build(raw)?);
                }
            }
            RawPack::Single(raw) => {
                forms.insert(String::new(), FormTables::build(&raw)?);
            }
        }
        Ok(UnitPack { forms })
    }

    pub fn form(&self, name: &str) -> Result<&FormTables, ParseError> {
        self.forms
            .get(name)
            .ok_or_else(|| ParseError::MissingForm(name.to_owned()))
    }

    pub fn forms(&self) -> impl Iterator<Item = (&str, &FormTables)> {
        self.forms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Modification;

    const CUT: &str = "[imgcut]\n0\nsheet.png\n1\n0,0,8,8,px";
    const MODEL: &str =
        "[modelanim:model]\n3\n1\n-1,-1,0,0,0,0,0,0,1000,1000,0,1000,0\n1000,3600,1000\n1\n0,0,0,0,0,0";
    const ANIM: &str = "[modelanim:animation]\n1\n1\n0,8,1,0\n1\n0,2000,0,0";

    fn pack_json(legacy: bool) -> String {
        serde_json::json!({
            "imgcut": CUT,
            "mamodel": MODEL,
            "maanim": [ANIM],
            "legacy": legacy,
        })
        .to_string()
    }

    #[test]
    fn single_form_packs_land_under_the_empty_key() {
        let pack = UnitPack::parse(&pack_json(false)).unwrap();
        assert_eq!(pack.len(), 1);
        let form = pack.form("").unwrap();
        assert_eq!(form.cut.cuts.len(), 1);
        assert_eq!(form.skeleton.parts.len(), 1);
        // animation slots pad out to the full set
        assert_eq!(form.anims.len(), AnimKind::ALL.len());
        assert!(form.anims[AnimKind::Idle.index()].tracks.is_empty());
    }

    #[test]
    fn legacy_flag_reaches_the_animation_decoder() {
        let pack = UnitPack::parse(&pack_json(true)).unwrap();
        let form = pack.form("").unwrap();
        assert_eq!(
            form.anims[0].tracks[0].modification,
            Modification::ScaleMult
        );
        let pack = UnitPack::parse(&pack_json(false)).unwrap();
        let form = pack.form("").unwrap();
        assert_eq!(form.anims[0].tracks[0].modification, Modification::Scale);
    }

    #[test]
    fn multi_form_packs_key_by_name() {
        let json = serde_json::json!({
            "forms": {
                "first": { "imgcut": CUT },
                "evolved": { "mamodel": MODEL },
            }
        })
        .to_string();
        let pack = UnitPack::parse(&json).unwrap();
        assert_eq!(pack.len(), 2);
        assert_eq!(pack.form("first").unwrap().cut.sheet, "sheet.png");
        // absent model falls back to the stand-in rig
        assert_eq!(pack.form("first").unwrap().skeleton.parts.len(), 1);
        assert!(matches!(
            pack.form("third"),
            Err(ParseError::MissingForm(_))
        ));
    }

    #[test]
    fn malformed_pack_json_is_reported() {
        assert!(matches!(
            UnitPack::parse("{not json"),
            Err(ParseError::Pack(_))
        ));
    }

    #[test]
    fn truncated_table_inside_a_pack_fails_loading() {
        let json = serde_json::json!({ "imgcut": "[imgcut]" }).to_string();
        assert!(matches!(
            UnitPack::parse(&json),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }
}

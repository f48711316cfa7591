use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cases::PairCase;
use elementwise_core::Scalar;

/// A labelled group of cases sharing one kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaseSet {
    Pairs {
        label: String,
        cases: Vec<PairCase>,
    },
    SigmoidSweep {
        label: String,
        #[serde(with = "lossless::seq")]
        inputs: Vec<Scalar>,
    },
}

impl CaseSet {
    pub fn label(&self) -> &str {
        match self {
            CaseSet::Pairs { label, .. } | CaseSet::SigmoidSweep { label, .. } => label,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CaseSet::Pairs { .. } => "pairs",
            CaseSet::SigmoidSweep { .. } => "sigmoid_sweep",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CaseSet::Pairs { cases, .. } => cases.len(),
            CaseSet::SigmoidSweep { inputs, .. } => inputs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk layouts accepted by [`import_case_sets_from_json`].
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Sets(Vec<CaseSet>),
    /// Bare array of pair cases, imported as one set labelled `legacy`.
    Legacy(Vec<PairCase>),
}

/// Writes labelled case sets to JSON so other runners can consume them.
pub fn export_case_sets_to_json<P: AsRef<Path>>(sets: &[CaseSet], path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(sets).context("failed to encode case sets")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write cases JSON to {}", path.as_ref().display()))?;
    tracing::info!(
        sets = sets.len(),
        path = %path.as_ref().display(),
        "exported case sets"
    );
    Ok(())
}

/// Loads case sets from JSON (labelled sets, or the legacy bare pair array).
pub fn import_case_sets_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<CaseSet>> {
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read cases JSON {}", path.as_ref().display()))?;
    parse_case_sets(&text)
        .with_context(|| format!("failed to parse cases JSON {}", path.as_ref().display()))
}

pub fn parse_case_sets(text: &str) -> Result<Vec<CaseSet>> {
    let document: Document =
        serde_json::from_str(text).context("expected an array of case sets or pair cases")?;
    Ok(match document {
        Document::Sets(sets) => sets,
        Document::Legacy(cases) => vec![CaseSet::Pairs {
            label: "legacy".to_string(),
            cases,
        }],
    })
}

/// Serde adapter that keeps NaN and infinities intact by writing them as
/// `"NaN"`, `"inf"` and `"-inf"`. Finite values stay JSON numbers.
pub mod lossless {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use elementwise_core::{Scalar, PRECISION};

    /// `None` when a finite JSON number overflows `Scalar`.
    #[allow(clippy::unnecessary_cast)]
    fn narrow(v: f64) -> Option<Scalar> {
        let narrowed = v as Scalar;
        (narrowed.is_finite() || !v.is_finite()).then_some(narrowed)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Scalar, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            value.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => narrow(v).ok_or_else(|| {
                de::Error::custom(format!("{v} does not fit in a {}-bit scalar", PRECISION.bits()))
            }),
            Repr::Text(text) => match text.as_str() {
                "NaN" | "nan" => Ok(Scalar::NAN),
                "inf" | "+inf" | "Infinity" => Ok(Scalar::INFINITY),
                "-inf" | "-Infinity" => Ok(Scalar::NEG_INFINITY),
                other => Err(de::Error::custom(format!(
                    "expected a number, \"NaN\", \"inf\" or \"-inf\", found \"{other}\""
                ))),
            },
        }
    }

    struct Wrapped(Scalar);

    impl Serialize for Wrapped {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serialize(&self.0, serializer)
        }
    }

    impl<'de> Deserialize<'de> for Wrapped {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserialize(deserializer).map(Wrapped)
        }
    }

    /// Same encoding for a sequence of scalars.
    pub mod seq {
        use serde::ser::SerializeSeq;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::Wrapped;
        use elementwise_core::Scalar;

        pub fn serialize<S: Serializer>(values: &[Scalar], serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(values.len()))?;
            for &v in values {
                seq.serialize_element(&Wrapped(v))?;
            }
            seq.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Scalar>, D::Error> {
            let wrapped = Vec::<Wrapped>::deserialize(deserializer)?;
            Ok(wrapped.into_iter().map(|w| w.0).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_round_trip() {
        let edge = PairCase::new(Scalar::NAN, Scalar::INFINITY, Scalar::NEG_INFINITY);
        let sets = vec![CaseSet::Pairs {
            label: "edges".into(),
            cases: vec![edge],
        }];
        let json = serde_json::to_string(&sets).unwrap();
        assert!(json.contains("\"NaN\""));
        assert!(json.contains("\"-inf\""));
        let back = parse_case_sets(&json).unwrap();
        match &back[0] {
            CaseSet::Pairs { cases, .. } => assert!(cases[0].bitwise_eq(&edge)),
            other => panic!("unexpected set {}", other.kind()),
        }
    }

    #[test]
    fn legacy_scale_defaults_to_one() {
        let sets = parse_case_sets(r#"[{"x": 1.5, "y": -2}]"#).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].label(), "legacy");
        match &sets[0] {
            CaseSet::Pairs { cases, .. } => {
                assert_eq!(cases[0], PairCase::new(1.5, -2.0, 1.0));
            }
            other => panic!("unexpected set {}", other.kind()),
        }
    }

    #[test]
    fn unknown_text_is_rejected() {
        assert!(parse_case_sets(r#"[{"x": "huge", "y": 1, "scale": 1}]"#).is_err());
        assert!(parse_case_sets(r#"[{"label": "a", "kind": "matrix", "cases": []}]"#).is_err());
    }

    #[test]
    fn large_finite_numbers_within_range_are_kept() {
        let sets = parse_case_sets(r#"[{"x": 1e30, "y": -3.0e38, "scale": 0.5}]"#).unwrap();
        match &sets[0] {
            CaseSet::Pairs { cases, .. } => {
                assert_eq!(cases[0].x, 1e30_f64 as Scalar);
                assert_eq!(cases[0].y, -3.0e38_f64 as Scalar);
            }
            other => panic!("unexpected set {}", other.kind()),
        }
    }

    #[cfg(not(feature = "double_precision"))]
    #[test]
    fn overflowing_numbers_are_rejected_in_narrow_builds() {
        let err = parse_case_sets(r#"[{"x": 1e300, "y": 0, "scale": 1}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("expected an array"));
        let sweep = r#"[{"kind": "sigmoid_sweep", "label": "s", "inputs": [0, -1e39]}]"#;
        assert!(parse_case_sets(sweep).is_err());
        assert!(parse_case_sets(r#"[{"x": "inf", "y": 0}]"#).is_ok());
    }

    #[test]
    fn empty_document_has_no_sets() {
        assert!(parse_case_sets("[]").unwrap().is_empty());
    }
}

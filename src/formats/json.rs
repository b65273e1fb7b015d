use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::Cue;

const SCHEMA: &str = "srtplay.cues";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedJson {
    pub schema: String,
    pub version: u32,
    pub cues: Vec<Cue>,
}

pub fn write_json(cues: &[Cue], wrapped: bool) -> Result<String> {
    if wrapped {
        let w = WrappedJson {
            schema: SCHEMA.to_string(),
            version: 1,
            cues: cues.to_vec(),
        };
        Ok(serde_json::to_string_pretty(&w)?)
    } else {
        Ok(serde_json::to_string_pretty(cues)?)
    }
}

/// Accepts either the wrapped document or a bare cue array. Sequence numbers
/// are reassigned by position, matching what the SRT parser produces.
pub fn parse_json(input: &str) -> Result<Vec<Cue>> {
    let v: Value = serde_json::from_str(input).context("invalid JSON")?;

    let arr = if let Some(cues) = v.get("cues") {
        cues.clone()
    } else if v.is_array() {
        v
    } else {
        return Err(anyhow!("unrecognized JSON cue list shape"));
    };

    let mut cues: Vec<Cue> =
        serde_json::from_value(arr).context("cues must be an array of cue objects")?;
    for (i, c) in cues.iter_mut().enumerate() {
        c.sequence_number = i as u32 + 1;
    }
    Ok(cues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_output_parses_back() {
        let cues = vec![Cue {
            sequence_number: 1,
            start_seconds: 0.5,
            end_seconds: 1.25,
            text: "hi".to_string(),
        }];
        let json = write_json(&cues, true).unwrap();
        assert!(json.contains("\"schema\": \"srtplay.cues\""));
        assert_eq!(parse_json(&json).unwrap(), cues);
    }

    #[test]
    fn bare_output_is_a_plain_array() {
        let cues = vec![Cue {
            sequence_number: 1,
            start_seconds: 2.0,
            end_seconds: 3.0,
            text: "plain".to_string(),
        }];
        let json = write_json(&cues, false).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        assert!(v.is_array());
        assert_eq!(v[0]["startSeconds"], 2.0);
        assert!(!json.contains("schema"));
        assert_eq!(parse_json(&json).unwrap(), cues);
    }

    #[test]
    fn bare_array_with_legacy_field_names() {
        let json = r#"[{"idx": 9, "start": 1.0, "end": 2.0, "text": "a"},
                       {"idx": 12, "start": 3.0, "end": 4.0, "text": "b"}]"#;
        let cues = parse_json(json).unwrap();
        assert_eq!(cues[0].sequence_number, 1);
        assert_eq!(cues[1].sequence_number, 2);
        assert_eq!(cues[1].start_seconds, 3.0);
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(parse_json(r#"{"segments": []}"#).is_err());
        assert!(parse_json("not json").is_err());
    }
}

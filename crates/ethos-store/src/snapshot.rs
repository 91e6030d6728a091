//! Versioned on-disk format

use crate::error::StoreError;
use ethos_session::Session;
use serde::{Deserialize, Serialize};

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a session.
///
/// The chosen scenario is stored by copy together with its catalog index,
/// so a snapshot stays readable even if the catalog later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub session: Session,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

/// Encode a session as a snapshot blob
///
/// # Errors
/// `StoreError::Malformed` if serialization fails.
pub fn encode(session: &Session) -> Result<String, StoreError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        session: session.clone(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Decode a snapshot blob
///
/// # Errors
/// - `StoreError::UnsupportedVersion` for another format version
/// - `StoreError::Malformed` for anything that is not a snapshot
pub fn decode(blob: &str) -> Result<Session, StoreError> {
    let header: VersionHeader = serde_json::from_str(blob)?;
    if header.version != SNAPSHOT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: header.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let snapshot: Snapshot = serde_json::from_str(blob)?;
    Ok(snapshot.session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethos_scenario::ScenarioDefinition;

    #[test]
    fn encodes_phase_and_version() {
        let mut session = Session::new();
        session.set_team_name("Night Desk").unwrap();
        session
            .select_scenario(2, ScenarioDefinition::new("Deepfake", "story"))
            .unwrap();
        session.add_issue("consent").unwrap();

        let blob = encode(&session).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["session"]["phase"], "active");
        assert_eq!(value["session"]["team"], "Night Desk");
        assert_eq!(value["session"]["work"]["scenario_index"], 2);
        assert_eq!(value["session"]["work"]["issues"][0], "consent");
        assert_eq!(decode(&blob).unwrap(), session);
    }

    #[test]
    fn rejects_other_versions() {
        let blob = r#"{"version": 7, "session": {"phase": "empty"}}"#;
        assert!(matches!(
            decode(blob),
            Err(StoreError::UnsupportedVersion { found: 7, expected: 1 })
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(StoreError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"version": 1, "session": {"phase": "active"}}"#),
            Err(StoreError::Malformed(_))
        ));
    }
}

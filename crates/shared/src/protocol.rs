use serde::{Deserialize, Serialize};

use crate::{domain::Unit, error::SyncError};

/// Mutation events pushed by the authority. The client applies these to its
/// registry strictly in arrival order; the transport must deliver them
/// ordered and at most once, since quantities travel as relative deltas.
///
/// `unit` is carried as the raw wire token and normalized by the
/// synchronizer, so an out-of-table token surfaces as an application-level
/// unknown-unit error rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ListEvent {
    AddToList {
        name: String,
        #[serde(default)]
        unit: String,
        quantity: f64,
    },
    UpdateTakenState {
        name: String,
        #[serde(default)]
        unit: String,
        taken: bool,
    },
    ReduceQuantity {
        name: String,
        #[serde(default)]
        unit: String,
    },
    RemoveTaken,
    RemoveAll,
}

/// Action requests sent to the authority after a confirmed gesture.
///
/// Dispatch is fire-and-forget: the visible list only changes when the
/// authority's corresponding [`ListEvent`] comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientAction {
    ToggleTaken { name: String, unit: Unit },
    ReduceQuantity { name: String, unit: Unit },
    RemoveAll,
    RemoveTaken,
}

/// Decodes one inbound text frame. Unknown tags, missing required fields and
/// type mismatches all classify as [`SyncError::MalformedEvent`].
pub fn decode_event(text: &str) -> Result<ListEvent, SyncError> {
    serde_json::from_str(text).map_err(|err| SyncError::malformed(err.to_string()))
}

/// Encodes one outbound action as a text frame.
pub fn encode_action(action: &ClientAction) -> Result<String, serde_json::Error> {
    serde_json::to_string(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_add_to_list_frame() {
        let event = decode_event(
            r#"{"type":"add_to_list","payload":{"name":"Milk","unit":"kg","quantity":2}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ListEvent::AddToList {
                name: "Milk".into(),
                unit: "kg".into(),
                quantity: 2.0,
            }
        );
    }

    #[test]
    fn absent_unit_field_defaults_to_empty_token() {
        let event =
            decode_event(r#"{"type":"add_to_list","payload":{"name":"Eggs","quantity":12}}"#)
                .unwrap();
        assert_eq!(
            event,
            ListEvent::AddToList {
                name: "Eggs".into(),
                unit: String::new(),
                quantity: 12.0,
            }
        );
    }

    #[test]
    fn bulk_events_carry_no_payload() {
        assert_eq!(decode_event(r#"{"type":"remove_all"}"#).unwrap(), ListEvent::RemoveAll);
        assert_eq!(
            decode_event(r#"{"type":"remove_taken"}"#).unwrap(),
            ListEvent::RemoveTaken
        );
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let err = decode_event(r#"{"type":"add_to_list","payload":{"name":"Milk"}}"#).unwrap_err();
        assert!(matches!(err, SyncError::MalformedEvent(_)));
    }

    #[test]
    fn unknown_tag_is_malformed() {
        let err = decode_event(r#"{"type":"rename_list","payload":{}}"#).unwrap_err();
        assert!(matches!(err, SyncError::MalformedEvent(_)));
    }

    #[test]
    fn actions_serialize_with_tagged_payloads() {
        let frame = encode_action(&ClientAction::ToggleTaken {
            name: "Milk".into(),
            unit: Unit::Kg,
        })
        .unwrap();
        assert_eq!(
            frame,
            r#"{"type":"toggle_taken","payload":{"name":"Milk","unit":"kg"}}"#
        );
        assert_eq!(
            encode_action(&ClientAction::RemoveAll).unwrap(),
            r#"{"type":"remove_all"}"#
        );
    }

    #[test]
    fn none_unit_serializes_as_empty_token() {
        let frame = encode_action(&ClientAction::ReduceQuantity {
            name: "Eggs".into(),
            unit: Unit::None,
        })
        .unwrap();
        assert_eq!(
            frame,
            r#"{"type":"reduce_quantity","payload":{"name":"Eggs","unit":""}}"#
        );
    }
}

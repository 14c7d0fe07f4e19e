use diatheke::{Action, CommandStatus, SessionInput, SessionOutput, SessionSnapshot, StatusCode};
use serde_json::json;

#[test]
fn session_output_deserialization() {
    let json = json!({
        "token": { "data": "AAEC", "id": "sess-9" },
        "actions": [
            { "type": "reply", "text": "Which size?", "luna_model": "luna-en" },
            { "type": "input_needed", "requires_wake_word": false, "immediate": true },
            { "type": "command", "id": "order", "state_id": "s4", "params": { "size": "large" } }
        ]
    });

    let output: SessionOutput = serde_json::from_value(json).expect("Failed to deserialize session output");
    assert_eq!(output.token.id(), "sess-9");
    assert_eq!(output.token.data(), &[0, 1, 2]);
    assert_eq!(output.actions.len(), 3);
    match &output.actions[2] {
        Action::Command(cmd) => {
            assert_eq!(cmd.id, "order");
            assert_eq!(cmd.params["size"], "large");
        }
        other => panic!("Wrong action: {other:?}"),
    }
    assert!(!output.is_end());
}

#[test]
fn command_status_serialization() {
    let status = CommandStatus::new("order", "s4").with_param("total", 12.5).succeeded();
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(
        value,
        json!({
            "command_id": "order",
            "state_id": "s4",
            "status": "success",
            "params": { "total": "12.5" }
        })
    );

    let failed: CommandStatus = serde_json::from_value(json!({
        "command_id": "order",
        "error_message": "payment declined"
    }))
    .unwrap();
    assert_eq!(failed.status, StatusCode::Failure);
    assert_eq!(failed.error_message.as_deref(), Some("payment declined"));
}

#[test]
fn session_input_variants_are_tagged() {
    let input: SessionInput = serde_json::from_value(json!({
        "type": "story",
        "story_id": "checkout",
        "params": { "cart": "3" }
    }))
    .unwrap();
    assert!(matches!(input, SessionInput::Story(ref story) if story.story_id == "checkout"));

    let input: SessionInput = serde_json::from_value(json!({
        "type": "recognition",
        "text": "two pizzas",
        "confidence": 0.9
    }))
    .unwrap();
    assert!(matches!(input, SessionInput::Recognition(ref result) if !result.timed_out));

    assert!(serde_json::from_value::<SessionInput>(json!({ "type": "audio" })).is_err());
}

#[test]
fn snapshot_round_trips_through_json() {
    let json = r#"{
        "model_id": "model-A",
        "token": { "data": "BQ==", "id": "sess-1", "metadata": "kiosk-3" },
        "state": "active",
        "pending": [{ "type": "session_end" }]
    }"#;

    let snapshot = SessionSnapshot::from_json(json).unwrap();
    assert_eq!(snapshot.token.metadata(), "kiosk-3");
    assert_eq!(snapshot.pending, vec![Action::SessionEnd]);

    let again = SessionSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(again, snapshot);
}

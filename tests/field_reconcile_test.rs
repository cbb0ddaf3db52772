//! Field session: pointer sync and scene reconciliation end to end.

use liveboard_lib::core::Position;
use liveboard_lib::field::FieldBounds;
use liveboard_lib::session::FieldSession;
use liveboard_lib::stream::{ConnectionStatus, StreamEvent};
use pretty_assertions::assert_eq;

fn session() -> FieldSession {
    FieldSession::new(FieldBounds::new(800.0, 400.0))
}

fn message(text: &str) -> StreamEvent {
    StreamEvent::Message(text.to_string())
}

#[test]
fn test_players_come_and_go_with_snapshots() {
    let mut session = session();

    let report = session
        .ingest(r#"{"ball":[400,200],"players":{"a":[10,20],"b":[30,40]}}"#)
        .unwrap();
    assert_eq!((report.created, report.updated, report.removed), (2, 0, 0));

    let report = session
        .ingest(r#"{"ball":[410,190],"players":{"b":[35,45],"c":[50,60]}}"#)
        .unwrap();
    assert_eq!((report.created, report.updated, report.removed), (1, 1, 1));

    let ids: Vec<&str> = session.scene().players().keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["b", "c"]);
    assert_eq!(session.scene().player("b"), Some(Position::new(35.0, 45.0)));
    assert_eq!(session.scene().ball(), Position::new(410.0, 190.0));
}

#[test]
fn test_empty_player_list_keeps_the_ball() {
    let mut session = session();
    session
        .ingest(r#"{"ball":[1,2],"players":{"a":[10,20]}}"#)
        .unwrap();
    let report = session.ingest(r#"{"ball":[3,4],"players":{}}"#).unwrap();

    assert_eq!(report.removed, 1);
    assert!(session.scene().players().is_empty());
    assert_eq!(session.scene().ball(), Position::new(3.0, 4.0));
}

#[test]
fn test_malformed_snapshots_are_counted_not_applied() {
    let mut session = session();
    session.handle(&message(r#"{"ball":[1,2],"players":{"a":[10,20]}}"#));
    session.handle(&message(r#"{"ball":[1,2],"players":{"a":[10]}}"#));
    session.handle(&message(r#"{"ball":"center","players":{}}"#));
    session.handle(&message("[]"));

    assert_eq!(session.received(), 4);
    assert_eq!(session.rejected(), 3);
    assert_eq!(session.scene().player("a"), Some(Position::new(10.0, 20.0)));
}

#[test]
fn test_pointer_is_debounced_per_interval() {
    let mut session = session();
    session.handle(&StreamEvent::Connected);

    assert!(session.pointer(Position::new(100.0, 50.0)));
    assert!(session.pointer(Position::new(120.0, 35.5)));
    // Only the latest target goes out
    assert_eq!(session.tick().unwrap().as_deref(), Some("[120.0,35.5]"));
    assert_eq!(session.tick().unwrap(), None);

    // Outside the field: ignored, nothing new to send
    assert!(!session.pointer(Position::new(900.0, 50.0)));
    assert!(!session.pointer(Position::new(100.0, -1.0)));
    assert_eq!(session.tick().unwrap(), None);
    assert_eq!(session.sync().target(), Some(Position::new(120.0, 35.5)));
}

#[test]
fn test_field_edges_are_inside() {
    let mut session = session();
    assert!(session.pointer(Position::new(0.0, 0.0)));
    assert!(session.pointer(Position::new(800.0, 400.0)));
}

#[test]
fn test_status_follows_the_channel() {
    let mut session = session();
    assert_eq!(session.status(), &ConnectionStatus::Connecting);

    session.handle(&StreamEvent::Connected);
    assert!(session.status().is_connected());

    session.handle(&StreamEvent::Disconnected {
        reason: "connection reset".to_string(),
    });
    assert_eq!(
        session.status(),
        &ConnectionStatus::Disconnected("connection reset".to_string())
    );

    session.handle(&StreamEvent::GaveUp { attempts: 3 });
    assert_eq!(session.status(), &ConnectionStatus::Offline);
}

use std::io::Write;
use std::sync::{Arc, Mutex};

use triage_core::models::decision::CareType;
use triage_engine::audit::DecisionEvent;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn emitted(event: &DecisionEvent) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || event.emit());
    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn transfer_event_carries_destination_and_reason() {
    let line = emitted(&DecisionEvent {
        decision_id: "d-1".to_string(),
        care_type: CareType::Transfer,
        severity: "critical".to_string(),
        hospital_id: Some("H003".to_string()),
        distance_km: Some(2.4),
        reason: "found 3 suitable hospitals".to_string(),
    });

    assert!(line.contains("decision event"));
    assert!(line.contains("audit.hospital_id=\"H003\"") || line.contains("audit.hospital_id=H003"));
    assert!(line.contains("audit.distance_km=2.4"));
    assert!(line.contains("audit.reason=found 3 suitable hospitals"));
}

#[test]
fn on_site_event_reports_no_hospital() {
    let line = emitted(&DecisionEvent {
        decision_id: "d-2".to_string(),
        care_type: CareType::OnSite,
        severity: "medium".to_string(),
        hospital_id: None,
        distance_km: None,
        reason: "low/medium severity; on-site care recommended".to_string(),
    });

    assert!(line.contains("audit.care_type=OnSite"));
    assert!(line.contains("none"));
    assert!(line.contains("audit.reason=low/medium severity; on-site care recommended"));
}

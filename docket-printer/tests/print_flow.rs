// docket-printer/tests/print_flow.rs
// End-to-end: JSON payload in, recorded driver sequence out.

use serde_json::json;

use docket_core::{PrintOutcome, PrintRequest};
use docket_printer::testing::{RecordedCall, RecordingFactory};
use docket_printer::{
    CutKind, DeviceStatus, DrawerPin, DriverError, PaperStatus, PrintEngine, PrintService,
    PrinterLang, PrinterModel, PulseWidth,
};

fn service_with(factory: RecordingFactory) -> PrintService<RecordingFactory> {
    PrintService::new(PrintEngine::new(factory))
}

fn texts(calls: &[RecordedCall]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| match call {
            RecordedCall::Text(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn sends(calls: &[RecordedCall]) -> usize {
    calls
        .iter()
        .filter(|call| matches!(call, RecordedCall::Send))
        .count()
}

#[tokio::test]
async fn test_full_payload_prints_end_to_end() {
    let factory = RecordingFactory::new();
    let service = service_with(factory.clone());

    let payload = json!({
        "config": {
            "target": "TCP:192.168.0.30",
            "model": "TM_m30III",
            "lang": "MODEL_ANK",
            "paperSize": "80mm",
            "timeout": 5000,
        },
        "store": {
            "name": "Harbour Cafe",
            "address": "2 Quay Street",
            "phone": "01736 700100",
        },
        "receipt": {
            "currency": "GBP",
            "createdAt": "2024-03-10T12:15:00Z",
            "orderId": "T-0042",
            "table": "12",
            "server": "Ines",
            "items": [
                {"name": "Fish Pie", "qty": 2, "unitPricePence": 650, "category": "Mains"},
                {"name": "Lemonade", "qty": 1, "unitPricePence": 300, "category": "Drinks", "note": "no ice"},
            ],
            "subTotal": 1600,
            "serviceCharge": 160,
            "total": 1760,
        },
        "printOptions": {
            "cutType": "CUT_FEED",
            "openDrawer": true,
            "printBarcode": {"data": "T-0042"},
            "printQr": {"data": "https://example.test/r/T-0042", "size": 8},
        },
        "footerLines": ["Thank you!", "Wifi: harbour / pier2024"],
        "copies": 2,
    });

    // 1. Submit and check the outcome.
    let outcome = service.print_direct_value(payload).await;
    assert_eq!(outcome, PrintOutcome::success(2));

    // 2. Driver opened with the requested model and language.
    let calls = factory.calls();
    assert_eq!(
        calls[0],
        RecordedCall::Open {
            model: PrinterModel::TmM30III,
            lang: PrinterLang::Ank,
        }
    );
    assert_eq!(
        calls[1],
        RecordedCall::Connect {
            target: "TCP:192.168.0.30".to_string(),
            timeout: std::time::Duration::from_millis(5000),
        }
    );

    // 3. Both copies were transmitted and verified.
    assert_eq!(sends(&calls), 2);
    assert_eq!(
        calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::QueryStatus))
            .count(),
        2
    );

    // 4. Rendered content reaches the buffer (spot checks, wide paper).
    let lines = texts(&calls);
    for expected in [
        "Harbour Cafe\n",
        "Tel: 01736 700100\n",
        "Date: 10/03/2024 12:15\n",
        "Order: T-0042\n",
        "Table: 12\n",
        "Server: Ines\n",
        "2 x Fish Pie                              £13.00\n",
        "1 x Lemonade                               £3.00\n",
        "  - no ice\n",
        "Subtotal: £16.00\n",
        "Service: £1.60\n",
        "TOTAL: £17.60\n",
        "Thank you!\n",
        "Wifi: harbour / pier2024\n",
    ] {
        assert!(
            lines.contains(&expected.to_string()),
            "missing line {expected:?}"
        );
    }

    // 5. Codes, drawer and cut come last in each copy.
    assert!(calls.contains(&RecordedCall::Barcode {
        data: "T-0042".to_string(),
        module_width: 3,
        height: 80,
    }));
    assert!(calls.contains(&RecordedCall::Qr {
        data: "https://example.test/r/T-0042".to_string(),
        size: 8,
    }));
    assert!(calls.contains(&RecordedCall::Pulse {
        pin: DrawerPin::Pin2,
        width: PulseWidth::Ms100,
    }));
    assert!(calls.contains(&RecordedCall::Cut(CutKind::Feed)));
}

#[tokio::test]
async fn test_decimal_money_payload_prints_in_minor_units() {
    let factory = RecordingFactory::new();
    let service = service_with(factory.clone());

    // Older tills send the receipt-level money as major-unit decimals;
    // those scale by 100. Item prices stay integer minor units.
    let payload = json!({
        "config": {"target": "TCP:192.168.0.31"},
        "receipt": {
            "currency": "USD",
            "items": [{"name": "Bagel", "qty": 1, "unitPricePence": 350}],
            "subTotal": 3.5,
            "total": 3.5,
        },
    });

    let outcome = service.print_direct_value(payload).await;
    assert_eq!(outcome, PrintOutcome::success(1));

    let lines = texts(&factory.calls());
    assert!(lines.contains(&"1 x Bagel                                  $3.50\n".to_string()));
    assert!(lines.contains(&"Subtotal: $3.50\n".to_string()));
    assert!(lines.contains(&"TOTAL: $3.50\n".to_string()));
}

#[tokio::test]
async fn test_narrow_paper_tightens_columns() {
    let factory = RecordingFactory::new();
    let service = service_with(factory.clone());

    let payload = json!({
        "config": {"target": "TCP:192.168.0.32", "paperSize": "58mm"},
        "receipt": {
            "items": [{"name": "Tea", "qty": 1, "unitPricePence": 250}],
            "subTotal": 250,
            "total": 250,
        },
    });

    let outcome = service.print_direct_value(payload).await;
    assert_eq!(outcome, PrintOutcome::success(1));
    assert!(texts(&factory.calls()).contains(&"1 x Tea                    £2.50\n".to_string()));
}

#[tokio::test]
async fn test_paper_runs_out_between_copies() {
    let healthy = DeviceStatus::default();
    let empty = DeviceStatus {
        paper: PaperStatus::Empty,
        ..DeviceStatus::default()
    };
    let factory = RecordingFactory::new().with_statuses([healthy, empty]);
    let service = service_with(factory.clone());

    let request: PrintRequest = serde_json::from_value(json!({
        "config": {"target": "TCP:192.168.0.33"},
        "receipt": {"items": [{"name": "Soup", "qty": 1, "unitPricePence": 400}]},
        "copies": 3,
    }))
    .expect("payload should decode");

    let outcome = service.print_direct(request).await;
    assert_eq!(outcome, PrintOutcome::failure("Printer is out of paper"));

    // Two copies were already on paper when the status check failed; no
    // third attempt is made.
    let calls = factory.calls();
    assert_eq!(sends(&calls), 2);
    assert_eq!(
        &calls[calls.len() - 4..],
        &[
            RecordedCall::EndTransaction,
            RecordedCall::Disconnect,
            RecordedCall::ClearBuffer,
            RecordedCall::DetachListener,
        ]
    );
}

#[tokio::test]
async fn test_invalid_payload_shape_is_rejected() {
    let factory = RecordingFactory::new();
    let service = service_with(factory.clone());

    let outcome = service.print_direct_value(json!(["config", "receipt"])).await;
    assert_eq!(outcome, PrintOutcome::failure("Invalid payload"));
    assert_eq!(factory.open_count(), 0);
}

#[tokio::test]
async fn test_missing_target_reports_without_transport() {
    let factory = RecordingFactory::new();
    let service = service_with(factory.clone());

    let outcome = service
        .print_direct_value(json!({"receipt": {"subTotal": 100}}))
        .await;
    assert_eq!(
        outcome,
        PrintOutcome::failure("Printer target not provided")
    );
    assert_eq!(factory.open_count(), 0);
    assert!(factory.calls().is_empty());
}

#[tokio::test]
async fn test_driver_refusal_surfaces_mapped_error() {
    let factory = RecordingFactory::new().with_open_fault(DriverError::InUse);
    let service = service_with(factory.clone());

    let outcome = service
        .print_direct_value(json!({"config": {"target": "TCP:192.168.0.34"}}))
        .await;
    assert_eq!(
        outcome,
        PrintOutcome::failure("Printer is currently in use")
    );
    assert_eq!(factory.open_count(), 1);
}

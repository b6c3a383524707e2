//! Integration tests for the HTTP ledger gateway
//!
//! Uses wiremock to stand in for the ledger authority and verifies the
//! wire contract: JSON key fidelity outbound, decode inbound, and the
//! uniform unavailable mapping for every failure shape.

use ledger_gateway::{
    ApproveWire, ContractApprovalWire, CreateTransferWire, Error, GatewayConfig,
    HttpLedgerGateway, LedgerGateway,
};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> HttpLedgerGateway {
    let config = GatewayConfig {
        base_url: server.uri(),
        request_timeout_ms: 500,
        connect_timeout_ms: 500,
    };
    HttpLedgerGateway::new(&config).unwrap()
}

fn create_request() -> CreateTransferWire {
    CreateTransferWire {
        transaction_id: "tx-100".to_string(),
        from_account: "ACC-A".to_string(),
        to_account: "ACC-B".to_string(),
        amount: Decimal::from(100),
        approvers: vec!["bank-x".to_string(), "bank-y".to_string()],
    }
}

#[tokio::test]
async fn test_submit_create_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tx/create"))
        .and(body_partial_json(json!({
            "transaction_id": "tx-100",
            "from_account": "ACC-A",
            "to_account": "ACC-B",
            "approvers": ["bank-x", "bank-y"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transaction_id": "tx-100",
            "from_account": "ACC-A",
            "to_account": "ACC-B",
            "amount": 100.0,
            "status": "PENDING",
            "approval_count": 0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let state = gateway.submit_create(&create_request()).await.unwrap();

    assert_eq!(state.transaction_id, "tx-100");
    assert_eq!(state.status, "PENDING");
    assert_eq!(state.approval_count, 0);
}

#[tokio::test]
async fn test_submit_approve_returns_authoritative_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tx/approve"))
        .and(body_partial_json(json!({
            "transaction_id": "tx-100",
            "approver_id": "bank-x",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transaction_id": "tx-100",
            "status": "PARTIALLY_APPROVED",
            "approval_count": 1,
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let state = gateway
        .submit_approve(&ApproveWire {
            transaction_id: "tx-100".to_string(),
            approver_id: "bank-x".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(state.status, "PARTIALLY_APPROVED");
    assert_eq!(state.approval_count, 1);
}

#[tokio::test]
async fn test_query_status_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tx/status/tx-100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transaction_id": "tx-100",
            "status": "EXECUTED",
            "approval_count": 2,
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let state = gateway.query_status("tx-100").await.unwrap();
    assert_eq!(state.status, "EXECUTED");
}

#[tokio::test]
async fn test_query_pending_filters_by_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tx/pending-approvals"))
        .and(query_param("user_id", "bank-x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "transaction_id": "tx-1", "status": "PENDING", "approval_count": 0 },
            { "transaction_id": "tx-2", "status": "PARTIALLY_APPROVED", "approval_count": 1 },
        ])))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let pending = gateway.query_pending("bank-x").await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[1].transaction_id, "tx-2");
}

#[tokio::test]
async fn test_contract_approve_uses_camel_case_keys() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contract/approve"))
        .and(body_partial_json(json!({
            "contractId": "c-1",
            "supplierId": "s-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let ack = gateway
        .approve_contract(&ContractApprovalWire {
            contract_id: "c-1".to_string(),
            supplier_id: "s-1".to_string(),
        })
        .await
        .unwrap();
    assert!(ack.is_success());
}

#[tokio::test]
async fn test_server_error_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tx/create"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.submit_create(&create_request()).await.unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));
}

#[tokio::test]
async fn test_timeout_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tx/create"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "transaction_id": "tx-100", "status": "PENDING" }))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.submit_create(&create_request()).await.unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));
}

#[tokio::test]
async fn test_undecodable_body_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tx/status/tx-100"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.query_status("tx-100").await.unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));
}

mod helpers;

use helpers::*;
use hickory_proto::op::MessageType;
use std::time::Duration;
use tokio::net::UdpSocket;

#[tokio::test]
async fn test_query_is_answered_and_indexed() {
    let es = MockElasticsearch::start(201).await;
    let probe = Probe::start(es.port()).await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let client_port = client.local_addr().unwrap().port();

    let reply = exchange(&client, probe.addr, &a_query(0x1D2E, "test.service."))
        .await
        .expect("reply");

    assert_eq!(reply.id(), 0x1D2E);
    assert_eq!(reply.message_type(), MessageType::Response);
    assert_eq!(reply.queries().len(), 1);
    assert_eq!(reply.queries()[0].name().to_ascii(), "test.service.");
    assert!(reply.answers().is_empty());

    let documents = wait_for_documents(&es, 1).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].method, "POST");
    assert_eq!(documents[0].path, "/dnsleak/_doc");
    let doc = &documents[0].body;
    assert_eq!(doc["query"], "test.service.");
    assert_eq!(doc["source-ip"], "127.0.0.1");
    assert_eq!(doc["source-port"], client_port);
}

#[tokio::test]
async fn test_truncated_datagram_is_dropped_and_serving_continues() {
    let es = MockElasticsearch::start(201).await;
    let probe = Probe::start(es.port()).await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    client.send_to(&[0x00, 0x01, 0x02], probe.addr).await.unwrap();
    let mut buf = [0u8; 512];
    let silent =
        tokio::time::timeout(Duration::from_millis(300), client.recv_from(&mut buf)).await;
    assert!(silent.is_err(), "truncated datagram must not be answered");
    assert!(es.documents().is_empty());

    let reply = exchange(&client, probe.addr, &a_query(7, "next.leak.test."))
        .await
        .expect("listener keeps serving");
    assert_eq!(reply.id(), 7);

    let documents = wait_for_documents(&es, 1).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].body["query"], "next.leak.test.");
}

#[tokio::test]
async fn test_unreachable_store_never_affects_replies() {
    let probe = Probe::start(closed_port()).await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    for i in 0..100u16 {
        let reply = exchange(&client, probe.addr, &a_query(i, "leak.test."))
            .await
            .expect("reply while store is down");
        assert_eq!(reply.id(), i);
        assert_eq!(reply.queries().len(), 1);
        assert!(reply.answers().is_empty());
    }
}

#[tokio::test]
async fn test_rejecting_store_sees_every_attempt() {
    let es = MockElasticsearch::start(503).await;
    let probe = Probe::start(es.port()).await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    for i in 0..100u16 {
        let reply = exchange(&client, probe.addr, &a_query(i, "leak.test."))
            .await
            .expect("reply while store rejects writes");
        assert_eq!(reply.id(), i);
    }

    assert_eq!(wait_for_documents(&es, 100).await.len(), 100);
}

#[tokio::test]
async fn test_simultaneous_senders_are_attributed_separately() {
    let es = MockElasticsearch::start(201).await;
    let probe = Probe::start(es.port()).await;
    let first = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let second = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let first_port = first.local_addr().unwrap().port();
    let second_port = second.local_addr().unwrap().port();

    let first_query = a_query(1, "alpha.leak.test.");
    let second_query = a_query(2, "beta.leak.test.");
    let (a, b) = tokio::join!(
        exchange(&first, probe.addr, &first_query),
        exchange(&second, probe.addr, &second_query),
    );
    assert_eq!(a.expect("first reply").id(), 1);
    assert_eq!(b.expect("second reply").id(), 2);

    let documents = wait_for_documents(&es, 2).await;
    assert_eq!(documents.len(), 2);
    for document in documents {
        let doc = &document.body;
        let expected_port = match doc["query"].as_str().unwrap() {
            "alpha.leak.test." => first_port,
            "beta.leak.test." => second_port,
            other => panic!("unexpected document {}", other),
        };
        assert_eq!(doc["source-port"], expected_port);
        assert_eq!(doc["source-ip"], "127.0.0.1");
    }
}

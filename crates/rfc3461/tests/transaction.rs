use maplit::btreemap;
use mail_attributes::{AttributeMap, AttributeStore, AttributeValue};
use rfc3461::*;

fn addr(s: &str) -> MailAddress {
    MailAddress::parse(s).unwrap()
}

#[test]
fn mail_from_to_attributes_and_back() {
    let mail_from: ArgLine = [("RET", "FULL"), ("ENVID", "abc123")].into_iter().collect();
    let rcpt_to: ArgLine = [("NOTIFY", "FAILURE,DELAY")].into_iter().collect();

    let params = DsnParameters::of(
        EnvId::from_arg_line(&mail_from),
        Ret::from_arg_line(&mail_from).unwrap(),
        btreemap! {
            addr("alice@x.com") => RecipientDsnParameters::from_arg_line(&rcpt_to)
                .unwrap()
                .unwrap(),
        },
    )
    .unwrap();

    let values = params.to_attributes();
    k9::assert_equal!(
        values,
        DsnAttributeValues {
            envid: Some("abc123".to_string()),
            ret: Some("FULL".to_string()),
            notify: Some(btreemap! {
                "alice@x.com".to_string() => "FAILURE,DELAY".to_string(),
            }),
            orcpt: None,
        }
    );

    let mut store = AttributeMap::new();
    params.store_attributes(&mut store).unwrap();
    k9::assert_equal!(
        store,
        btreemap! {
            ENVID_ATTRIBUTE => AttributeValue::from("abc123"),
            RET_ATTRIBUTE => AttributeValue::from("FULL"),
            NOTIFY_ATTRIBUTE => AttributeValue::from(btreemap! {
                "alice@x.com".to_string() => "FAILURE,DELAY".to_string(),
            }),
        }
    );

    k9::assert_equal!(DsnParameters::load_attributes(&store).unwrap(), Some(params));
}

#[test]
fn smtp_session_through_message_metadata() {
    let mut txn = DsnTransaction::new(DsnConfig {
        max_envid_length: Some(100),
        ..Default::default()
    });
    txn.mail_from(&ArgLine::parse("RET=HDRS ENVID=QQ314159 SIZE=2048").unwrap())
        .unwrap();
    txn.rcpt_to(
        addr("alice@x.com"),
        &ArgLine::parse("NOTIFY=SUCCESS,FAILURE ORCPT=rfc822;Alice@Old.example").unwrap(),
    )
    .unwrap();
    txn.rcpt_to(
        addr("bob@x.com"),
        &ArgLine::parse("ORCPT=rfc822;bob@old.example").unwrap(),
    )
    .unwrap();
    txn.rcpt_to(addr("carol@x.com"), &ArgLine::new()).unwrap();
    let params = txn.build().unwrap();

    let mut meta = serde_json::json!({"received_from": "127.0.0.1:2525"});
    params.store_attributes(&mut meta).unwrap();
    k9::assert_equal!(
        meta,
        serde_json::json!({
            "received_from": "127.0.0.1:2525",
            "dsn-envid": "QQ314159",
            "dsn-ret": "HDRS",
            "dsn-notify": {"alice@x.com": "SUCCESS,FAILURE"},
            "dsn-orcpt": {
                "alice@x.com": "Alice@old.example",
                "bob@x.com": "bob@old.example"
            }
        })
    );

    // Simulate the metadata being saved and later reloaded by a delivery stage
    let saved = serde_json::to_vec(&meta).unwrap();
    let reloaded: serde_json::Value = serde_json::from_slice(&saved).unwrap();
    let rehydrated = DsnParameters::load_attributes(&reloaded).unwrap().unwrap();
    k9::assert_equal!(&rehydrated, &params);

    let bob = rehydrated.recipient(&addr("bob@x.com")).unwrap();
    k9::assert_equal!(bob.notify(), None);
    k9::assert_equal!(bob.orcpt(), Some(&addr("bob@old.example")));
    k9::assert_equal!(rehydrated.recipient(&addr("carol@x.com")), None);

    let relayed: Vec<String> = rehydrated
        .recipient(&addr("alice@x.com"))
        .unwrap()
        .to_esmtp_parameters()
        .iter()
        .map(|p| p.to_string())
        .collect();
    k9::assert_equal!(
        relayed,
        vec!["NOTIFY=SUCCESS,FAILURE", "ORCPT=rfc822;Alice@old.example"]
    );
}

#[test]
fn corrupt_metadata_is_reported() {
    let meta = serde_json::json!({"dsn-notify": {"alice@x.com": "SOMETIMES"}});
    let err = DsnParameters::load_attributes(&meta).unwrap_err();
    k9::assert_equal!(
        err.downcast_ref::<DsnError>(),
        Some(&DsnError::InvalidNotify("SOMETIMES".to_string()))
    );

    let meta = serde_json::json!({"dsn-ret": ["FULL"]});
    assert!(DsnParameters::load_attributes(&meta).is_err());

    // a map where a string is expected is ignored rather than rejected
    let meta = serde_json::json!({"dsn-ret": {"FULL": "HDRS"}});
    k9::assert_equal!(DsnParameters::load_attributes(&meta).unwrap(), None);
}

#[test]
fn absent_parameters_clear_the_store() {
    let mut meta = serde_json::json!({
        "dsn-ret": "FULL",
        "dsn-envid": "stale",
        "queue": "x.com"
    });
    let txn = DsnTransaction::default();
    match txn.build() {
        Some(params) => params.store_attributes(&mut meta).unwrap(),
        None => DsnParameters::clear_attributes(&mut meta).unwrap(),
    }
    k9::assert_equal!(meta, serde_json::json!({"queue": "x.com"}));
    k9::assert_equal!(meta.attribute(&NOTIFY_ATTRIBUTE).unwrap(), None);
}

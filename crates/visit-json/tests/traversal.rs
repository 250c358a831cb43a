//! End-to-end traversals through the JSON backends.
//!
//! The traversal functions here play the role of generated per-type code:
//! a fixed call sequence mirroring the schema shape, issued against a
//! `Visitor` without knowing which mode is active.

use std::mem;

use schema_visit::{
    Backend, ErrorClass, ListNode, ReleaseBackend, ValueKind, VisitError, Visitor,
};
use schema_visit_json::{JsonDecodeBackend, JsonEncodeBackend};
use serde_json::{json, Value};

const MODE_NAMES: &[&str] = &["auto", "manual"];

#[derive(Default)]
struct U16Link {
    next: Option<Box<U16Link>>,
    value: u16,
}

impl ListNode for U16Link {
    fn next_mut(&mut self) -> &mut Option<Box<Self>> {
        &mut self.next
    }
}

#[derive(Default)]
struct Target {
    host: Option<String>,
    port: u16,
}

#[derive(Default)]
struct BackupJob {
    enabled: bool,
    retries: u8,
    mode: usize,
    label: Option<String>,
    window: u64,
    limits: Option<Box<U16Link>>,
    target: Target,
    meta: Option<Value>,
}

fn visit_target<B: Backend>(
    v: &mut Visitor<B>,
    name: Option<&str>,
    target: &mut Target,
) -> Result<(), VisitError> {
    v.start_struct::<()>(name, None)?;
    v.type_str(Some("host"), &mut target.host)?;
    v.type_u16(Some("port"), &mut target.port)?;
    v.end_struct()
}

fn visit_backup_job<B: Backend>(
    v: &mut Visitor<B>,
    job: &mut BackupJob,
) -> Result<(), VisitError> {
    v.start_struct::<()>(None, None)?;
    v.type_bool(Some("enabled"), &mut job.enabled)?;
    v.type_u8(Some("retries"), &mut job.retries)?;
    v.type_enum(Some("mode"), &mut job.mode, MODE_NAMES)?;

    let mut has_label = job.label.is_some();
    if v.optional(Some("label"), &mut has_label) {
        v.type_str(Some("label"), &mut job.label)?;
    }

    v.type_size(Some("window"), &mut job.window)?;

    v.start_list(Some("limits"))?;
    let size = mem::size_of::<U16Link>();
    let mut slot = &mut job.limits;
    while let Some(node) = v.next_list(slot, size) {
        v.type_u16(None, &mut node.value)?;
        slot = node.next_mut();
    }
    v.end_list();

    visit_target(v, Some("target"), &mut job.target)?;
    v.type_any(Some("meta"), &mut job.meta)?;
    v.end_struct()
}

fn chain(values: &[u16]) -> Option<Box<U16Link>> {
    let mut head = None;
    for &value in values.iter().rev() {
        head = Some(Box::new(U16Link { next: head, value }));
    }
    head
}

fn collect(head: &Option<Box<U16Link>>) -> Vec<u16> {
    let mut out = Vec::new();
    let mut cursor = head.as_deref();
    while let Some(node) = cursor {
        out.push(node.value);
        cursor = node.next.as_deref();
    }
    out
}

fn sample_job() -> BackupJob {
    BackupJob {
        enabled: true,
        retries: 5,
        mode: 1,
        label: Some("nightly".into()),
        window: 3600,
        limits: chain(&[10, 20, 30]),
        target: Target {
            host: Some("db1".into()),
            port: 5432,
        },
        meta: Some(json!({"priority": "high"})),
    }
}

fn encode_job(job: &mut BackupJob) -> Value {
    let mut v = Visitor::new(JsonEncodeBackend::new());
    visit_backup_job(&mut v, job).unwrap();
    v.into_inner().into_value()
}

#[test]
fn encode_produces_the_expected_json() {
    let encoded = encode_job(&mut sample_job());
    assert_eq!(
        encoded,
        json!({
            "enabled": true,
            "retries": 5,
            "mode": "manual",
            "label": "nightly",
            "window": 3600,
            "limits": [10, 20, 30],
            "target": {"host": "db1", "port": 5432},
            "meta": {"priority": "high"},
        })
    );
}

#[test]
fn encode_then_strict_decode_reproduces_the_value() {
    let encoded = encode_job(&mut sample_job());

    let mut decoded = BackupJob::default();
    let mut v = Visitor::new(JsonDecodeBackend::new_strict(&encoded));
    visit_backup_job(&mut v, &mut decoded).unwrap();

    assert!(decoded.enabled);
    assert_eq!(decoded.retries, 5);
    assert_eq!(decoded.mode, 1);
    assert_eq!(decoded.label.as_deref(), Some("nightly"));
    assert_eq!(decoded.window, 3600);
    assert_eq!(collect(&decoded.limits), vec![10, 20, 30]);
    assert_eq!(decoded.target.host.as_deref(), Some("db1"));
    assert_eq!(decoded.target.port, 5432);
    assert_eq!(decoded.meta, Some(json!({"priority": "high"})));
}

#[test]
fn absent_optional_field_is_skipped() {
    let mut job = sample_job();
    job.label = None;
    let encoded = encode_job(&mut job);
    assert!(encoded.get("label").is_none());

    let mut decoded = BackupJob::default();
    let mut v = Visitor::new(JsonDecodeBackend::new_strict(&encoded));
    visit_backup_job(&mut v, &mut decoded).unwrap();
    assert!(decoded.label.is_none());
}

#[test]
fn empty_list_round_trips() {
    let mut job = sample_job();
    job.limits = None;
    let encoded = encode_job(&mut job);
    assert_eq!(encoded["limits"], json!([]));

    let mut decoded = BackupJob::default();
    let mut v = Visitor::new(JsonDecodeBackend::new(&encoded));
    visit_backup_job(&mut v, &mut decoded).unwrap();
    assert!(decoded.limits.is_none());
}

#[test]
fn decode_links_one_node_per_input_element() {
    let mut job = sample_job();
    job.limits = chain(&[5, 6, 7, 8]);
    let encoded = encode_job(&mut job);

    let mut decoded = BackupJob::default();
    let mut v = Visitor::new(JsonDecodeBackend::new(&encoded));
    visit_backup_job(&mut v, &mut decoded).unwrap();
    assert_eq!(collect(&decoded.limits).len(), 4);
}

#[test]
fn strict_decode_rejects_unknown_member() {
    let mut encoded = encode_job(&mut sample_job());
    encoded["frequency"] = json!("daily");

    let mut decoded = BackupJob::default();
    let mut v = Visitor::new(JsonDecodeBackend::new_strict(&encoded));
    let err = visit_backup_job(&mut v, &mut decoded).unwrap_err();
    assert_eq!(err.to_string(), "Invalid parameter 'frequency'");
}

#[test]
fn lenient_decode_ignores_unknown_member() {
    let mut encoded = encode_job(&mut sample_job());
    encoded["frequency"] = json!("daily");

    let mut decoded = BackupJob::default();
    let mut v = Visitor::new(JsonDecodeBackend::new(&encoded));
    visit_backup_job(&mut v, &mut decoded).unwrap();
    assert_eq!(decoded.retries, 5);
}

#[test]
fn release_traversal_reclaims_heap_fields() {
    let mut job = sample_job();
    let mut v = Visitor::new(ReleaseBackend);
    visit_backup_job(&mut v, &mut job).unwrap();

    assert!(job.label.is_none());
    assert!(job.target.host.is_none());
    assert!(job.meta.is_none());
}

// ── Name-table and range edge cases ───────────────────────────────────────

#[test]
fn mode_enum_scenario() {
    // Decode "manual" → index 1.
    let input = json!({"mode": "manual"});
    let mut v = Visitor::new(JsonDecodeBackend::new(&input));
    v.start_struct::<()>(None, None).unwrap();
    let mut mode = 0usize;
    v.type_enum(Some("mode"), &mut mode, MODE_NAMES).unwrap();
    assert_eq!(mode, 1);

    // Decode "bogus" → invalid parameter naming the string.
    let input = json!({"mode": "bogus"});
    let mut v = Visitor::new(JsonDecodeBackend::new(&input));
    v.start_struct::<()>(None, None).unwrap();
    let mut mode = 0usize;
    let err = v.type_enum(Some("mode"), &mut mode, MODE_NAMES).unwrap_err();
    assert_eq!(err.to_string(), "Invalid parameter 'bogus'");
    assert_eq!(err.class(), ErrorClass::InvalidParameter);

    // Encode index 0 → "auto".
    let mut v = Visitor::new(JsonEncodeBackend::new());
    v.start_struct::<()>(None, None).unwrap();
    let mut mode = 0usize;
    v.type_enum(Some("mode"), &mut mode, MODE_NAMES).unwrap();
    v.end_struct().unwrap();
    assert_eq!(v.into_inner().into_value(), json!({"mode": "auto"}));
}

#[test]
fn uint8_scenario() {
    // Wide value 300 → range error naming the width token.
    let input = json!({"retries": 300});
    let mut v = Visitor::new(JsonDecodeBackend::new(&input));
    v.start_struct::<()>(None, None).unwrap();
    let mut retries: u8 = 9;
    let err = v.type_u8(Some("retries"), &mut retries).unwrap_err();
    assert_eq!(err.to_string(), "Parameter 'retries' expects uint8_t");
    assert_eq!(err.class(), ErrorClass::InvalidParameterValue);
    assert_eq!(retries, 9, "destination must stay untouched");

    // Wide value 200 → stored.
    let input = json!({"retries": 200});
    let mut v = Visitor::new(JsonDecodeBackend::new(&input));
    v.start_struct::<()>(None, None).unwrap();
    let mut retries: u8 = 0;
    v.type_u8(Some("retries"), &mut retries).unwrap();
    assert_eq!(retries, 200);
}

#[test]
fn negative_input_for_unsigned_width_is_rejected() {
    let input = json!({"retries": -1});
    let mut v = Visitor::new(JsonDecodeBackend::new(&input));
    v.start_struct::<()>(None, None).unwrap();
    let mut retries: u8 = 0;
    let err = v.type_u8(Some("retries"), &mut retries).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid parameter type for 'retries', expected: integer"
    );
}

// ── Dynamic types and implicit structs ────────────────────────────────────

#[test]
fn peeked_kind_selects_the_decoding_path() {
    fn decode_payload(input: &Value) -> Result<Value, VisitError> {
        let mut v = Visitor::new(JsonDecodeBackend::new(input));
        v.start_struct::<()>(None, None)?;
        let mut kind = None;
        v.get_next_type(Some("payload"), &mut kind)?;
        let out = match kind {
            Some(ValueKind::String) => {
                let mut s = None;
                v.type_str(Some("payload"), &mut s)?;
                Value::from(s.unwrap())
            }
            _ => {
                let mut n = 0u64;
                v.type_u64(Some("payload"), &mut n)?;
                Value::from(n)
            }
        };
        v.end_struct()?;
        Ok(out)
    }

    assert_eq!(
        decode_payload(&json!({"payload": "hello"})).unwrap(),
        json!("hello")
    );
    assert_eq!(decode_payload(&json!({"payload": 17})).unwrap(), json!(17));
}

#[test]
fn implicit_struct_reads_from_the_parent_object() {
    #[derive(Default)]
    struct CommonOpts {
        verbose: bool,
    }

    let input = json!({"kind": "full", "verbose": true});
    let mut v = Visitor::new(JsonDecodeBackend::new_strict(&input));
    v.start_struct::<()>(None, None).unwrap();

    let mut kind = None;
    v.type_str(Some("kind"), &mut kind).unwrap();
    assert_eq!(kind.as_deref(), Some("full"));

    let mut opts: Option<CommonOpts> = None;
    v.start_implicit_struct(Some(&mut opts)).unwrap();
    let opts_ref = opts.as_mut().expect("decode materializes the storage");
    v.type_bool(Some("verbose"), &mut opts_ref.verbose).unwrap();
    v.end_implicit_struct();

    v.end_struct().unwrap();
    assert!(opts.unwrap().verbose);
}

#[test]
fn encode_backend_lacks_the_optional_capability() {
    // The fallback reports every field as present, driven by the caller's
    // own initial value.
    let mut v = Visitor::new(JsonEncodeBackend::new());
    let mut present = true;
    assert!(v.optional(Some("label"), &mut present));
    assert!(present);
}

//! Binary (compressed) frame vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use stomp_ws_core::protocol::{normalize, normalize_binary, NormalizeLimits, RawPayload};

mod vector_loader;
use vector_loader::load;

#[test]
fn binary_vectors() {
    let files = [
        "message_hello.json",
        "message_no_terminator.json",
        "message_multibyte_body.json",
        "message_body_with_blank_line.json",
        "empty_payload.json",
        "no_separator.json",
        "bare_header.json",
        "not_deflate.json",
        "truncated_body.json",
        "raw_deflate_body.json",
        "non_ascii_header.json",
        "invalid_utf8_body.json",
    ];
    let limits = NormalizeLimits::default();

    for f in files {
        let v = load(f);
        let raw = v.frame.decode();
        let res = normalize_binary(&raw, &limits);

        // the dropping entry point must agree with the typed one
        let dropped = normalize(RawPayload::Binary(Bytes::from(raw)), &limits);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.kind().as_str(), err.code, "vector={}", v.description);
            assert!(e.is_payload_error(), "vector={}", v.description);
            assert_eq!(dropped, Err(e.kind()), "vector={}", v.description);
            continue;
        }

        let frame = res.expect("expected ok frame");
        let ex = v.expect.expect("missing expect block");
        let want = ex["frame"].as_str().unwrap();

        assert_eq!(frame, want, "vector={}", v.description);
        assert!(frame.ends_with('\0'), "vector={}", v.description);
        assert_eq!(dropped.as_deref(), Ok(want), "vector={}", v.description);
    }
}

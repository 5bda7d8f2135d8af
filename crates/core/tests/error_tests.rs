// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use expense_tracker_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad value".into());
        assert_eq!(err.to_string(), "Serialization error: bad value");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn source() {
        let err = CoreError::Source {
            source_name: "InMemory".into(),
            message: "lock poisoned".into(),
        };
        assert_eq!(err.to_string(), "Source error (InMemory): lock poisoned");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("amount must be finite".into());
        assert_eq!(err.to_string(), "Validation failed: amount must be finite");
    }

    #[test]
    fn transaction_not_found() {
        let err = CoreError::TransactionNotFound("abc".into());
        assert_eq!(err.to_string(), "Transaction not found: abc");
    }

    #[test]
    fn validation_empty_message() {
        let err = CoreError::ValidationError(String::new());
        assert_eq!(err.to_string(), "Validation failed: ");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: CoreError = io.into();
        match err {
            CoreError::FileIO(msg) => assert!(msg.contains("missing file")),
            other => panic!("Expected FileIO, got {:?}", other),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_propagates_io() {
        fn read() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/a/real/path.json")?)
        }
        assert!(matches!(read(), Err(CoreError::FileIO(_))));
    }
}

// ── Trait bounds ────────────────────────────────────────────────────

mod traits {
    use super::*;

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CoreError>();
    }

    #[test]
    fn debug_contains_variant() {
        let err = CoreError::TransactionNotFound("x".into());
        assert!(format!("{err:?}").contains("TransactionNotFound"));
    }
}

use yangtree_core::errors::{ExError, ExErrorKind, YangError};
use yangtree_core::ElementId;

#[test]
fn test_duplicate_key_carries_list_path() {
    let err = YangError::DuplicateKey {
        list: "/interfaces/interface".to_string(),
        key: "eth0".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateKey);
    assert_eq!(ex_err.code(), "ERR_DUPLICATE_KEY");
    assert_eq!(ex_err.op(), Some("list_add"));
    assert_eq!(ex_err.path(), Some("/interfaces/interface"));
    assert!(ex_err.message().contains("eth0"));
}

#[test]
fn test_missing_key_and_arity_share_kind() {
    let missing: ExError = YangError::MissingKey {
        list: "/l".to_string(),
        key: "k".to_string(),
    }
    .into();
    let arity: ExError = YangError::KeyArity {
        list: "/l".to_string(),
        expected: vec!["a".to_string(), "b".to_string()],
        got: "1".to_string(),
    }
    .into();

    assert_eq!(missing.kind(), ExErrorKind::MissingKey);
    assert_eq!(arity.kind(), ExErrorKind::MissingKey);
    assert_eq!(missing.op(), None);
    assert_eq!(arity.op(), Some("list_add"));
}

#[test]
fn test_constraint_violation_message() {
    let err = YangError::ConstraintViolation {
        value: "abc1".to_string(),
        restriction: "pattern [\"^(?:[a-z]+)$\"]".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(ex_err.code(), "ERR_CONSTRAINT_VIOLATION");
    assert!(ex_err.message().contains("'abc1' did not match restricted type"));
}

#[test]
fn test_type_errors_share_kind_with_candidates() {
    let list: ExError = YangError::TypedListRejected {
        value: "x".to_string(),
        allowed: vec!["uint64 range 0..255".to_string()],
    }
    .into();
    let union: ExError = YangError::UnionMismatch {
        value: "x".to_string(),
        candidates: vec!["int64".to_string(), "boolean".to_string()],
    }
    .into();
    let plain: ExError = YangError::TypeMismatch {
        value: "x".to_string(),
        expected: "boolean".to_string(),
    }
    .into();

    for err in [&list, &union, &plain] {
        assert_eq!(err.kind(), ExErrorKind::TypeMismatch);
    }
    assert_eq!(list.candidates().map(<[String]>::len), Some(1));
    assert_eq!(union.candidates().map(<[String]>::len), Some(2));
    assert!(plain.candidates().is_none());
}

#[test]
fn test_precision_maps_to_invalid_restriction() {
    let ex_err: ExError = YangError::InvalidPrecision { digits: 40 }.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidRestriction);
    assert!(ex_err.message().contains("40"));
}

#[test]
fn test_capability_error_names_op() {
    let err = YangError::CapabilityUnsupported {
        op: "append".to_string(),
        base_type: "boolean".to_string(),
    };
    assert_eq!(err.to_string(), "boolean object has no attribute append");

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::CapabilityUnsupported);
    assert_eq!(ex_err.op(), Some("append"));
}

#[test]
fn test_resolution_failure_and_invalid_pointer() {
    let failure: ExError = YangError::ResolutionFailure {
        value: "eth9".to_string(),
        path: "/interfaces/interface/name".to_string(),
        candidates: vec!["eth0".to_string()],
    }
    .into();
    let pointer: ExError = YangError::InvalidPointer {
        path: "/system/mtu".to_string(),
        matches: 0,
    }
    .into();

    assert_eq!(failure.kind(), ExErrorKind::ResolutionFailure);
    assert_eq!(failure.path(), Some("/interfaces/interface/name"));
    assert_eq!(failure.candidates(), Some(&["eth0".to_string()][..]));
    assert_eq!(pointer.kind(), ExErrorKind::ResolutionFailure);
    assert_eq!(pointer.op(), Some("read_pointer"));
}

#[test]
fn test_lookup_errors_are_not_found() {
    let errors = [
        YangError::ElementNotFound {
            id: ElementId::new(7),
        },
        YangError::ChildNotFound {
            parent: "/system".to_string(),
            name: "hostname".to_string(),
        },
        YangError::ValueNotPresent {
            owner: "leaf-list of (string)".to_string(),
            value: "a".to_string(),
        },
    ];
    for err in errors {
        let ex_err: ExError = err.into();
        assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
        assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    }
}

#[test]
fn test_input_errors_are_invalid_input() {
    let index: ExError = YangError::IndexOutOfRange { index: 3, len: 1 }.into();
    let config: ExError = YangError::InvalidConfig {
        reason: "unknown field".to_string(),
    }
    .into();
    assert_eq!(index.kind(), ExErrorKind::InvalidInput);
    assert_eq!(config.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_error_kind_code_mapping() {
    // Test that each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::ConstraintViolation, "ERR_CONSTRAINT_VIOLATION"),
        (ExErrorKind::TypeMismatch, "ERR_TYPE_MISMATCH"),
        (ExErrorKind::InvalidRestriction, "ERR_INVALID_RESTRICTION"),
        (ExErrorKind::DuplicateKey, "ERR_DUPLICATE_KEY"),
        (ExErrorKind::MissingKey, "ERR_MISSING_KEY"),
        (ExErrorKind::CapabilityUnsupported, "ERR_CAPABILITY_UNSUPPORTED"),
        (ExErrorKind::UnmappedChoiceCase, "ERR_UNMAPPED_CHOICE_CASE"),
        (ExErrorKind::ResolutionFailure, "ERR_RESOLUTION_FAILURE"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

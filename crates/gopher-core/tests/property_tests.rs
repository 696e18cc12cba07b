//! Property-based tests for path confinement, quotas, and bounded copies.
//!
//! These tests use proptest to generate arbitrary inputs and verify
//! security properties hold across a wide range of cases.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::Cursor;
use std::path::Path;
use std::path::PathBuf;

use gopher_core::InstallConfig;
use gopher_core::InstallError;
use gopher_core::QuotaResource;
use gopher_core::SecurityError;
use gopher_core::copy::CopyBuffer;
use gopher_core::copy::copy_bounded;
use gopher_core::security::QuotaTracker;
use gopher_core::security::mask_mode;
use gopher_core::security::sanitize_path;
use gopher_core::security::validate_path;
use gopher_core::security::validate_path_within_root;
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    /// Any path with a `..` segment is rejected, whatever surrounds it.
    #[test]
    fn prop_parent_segment_rejected(
        prefix in "([a-z]+/){0,5}",
        suffix in "([a-z]+/?){0,5}"
    ) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join(format!("{prefix}../{suffix}"));

        let result = validate_path_within_root(&path, temp.path());
        prop_assert!(
            matches!(result, Err(SecurityError::PathTraversal { .. })),
            "path with .. should be rejected"
        );
    }

    /// Plain component paths below the root are accepted and stay below it.
    #[test]
    fn prop_valid_relative_paths_accepted(
        components in prop::collection::vec("[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,19}", 1..8)
    ) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let relative = PathBuf::from(components.join("/"));
        prop_assume!(!relative.to_string_lossy().contains(".."));

        let contained = validate_path_within_root(&temp.path().join(&relative), temp.path());
        prop_assert!(contained.is_ok(), "valid path should be accepted");
        let contained = contained.unwrap();
        prop_assert_eq!(contained.relative(), relative.as_path());
    }

    /// Sibling directories sharing the root's name as a prefix are outside it.
    #[test]
    fn prop_sibling_prefix_rejected(suffix in "[a-z0-9]{1,10}") {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = temp.path().join("go");
        let sibling = temp.path().join(format!("go{suffix}"));

        prop_assert!(validate_path_within_root(&sibling, &root).is_err());
    }

    /// Sanitized output is either empty or passes validation.
    #[test]
    fn prop_sanitized_paths_validate(input in "[ -~]{0,64}") {
        let sanitized = sanitize_path(&input);
        prop_assert!(
            sanitized.as_os_str().is_empty() || validate_path(&sanitized).is_ok(),
            "sanitized {:?} from {:?} failed validation",
            sanitized,
            input
        );
    }

    /// Masked modes never carry bits outside `rwxrwxrwx`.
    #[test]
    fn prop_mask_mode_bounded(mode in any::<u32>()) {
        let masked = mask_mode(mode);
        prop_assert!(masked <= 0o777);
        prop_assert_eq!(masked, mode & 0o777);
    }

    // ========================================================================
    // QUOTA TRACKER PROPERTY TESTS
    // ========================================================================

    /// Accepted declared bytes never exceed the total ceiling.
    #[test]
    fn prop_quota_total_never_exceeded(
        max_size in 1000u64..100_000,
        file_sizes in prop::collection::vec(0u64..5000, 1..100)
    ) {
        let mut tracker = QuotaTracker::new();
        let config = InstallConfig::default()
            .with_max_total_size(max_size)
            .with_max_file_size(u64::MAX)
            .with_max_file_count(usize::MAX);

        for size in file_sizes {
            let result = tracker.record_file(Path::new("go/file"), size, &config);
            if let Err(err) = result {
                prop_assert!(
                    matches!(
                        err,
                        InstallError::QuotaExceeded {
                            resource: QuotaResource::TotalSize { .. },
                            ..
                        }
                    ),
                    "error should be TotalSize"
                );
            }
            prop_assert!(tracker.declared_bytes() <= max_size);
        }
    }

    /// Entry count quota admits exactly `max_files` entries.
    #[test]
    fn prop_quota_file_count_enforcement(
        max_files in 1usize..500,
        num_files in 1usize..1000
    ) {
        let mut tracker = QuotaTracker::new();
        let config = InstallConfig::default().with_max_file_count(max_files);

        let accepted = (0..num_files)
            .filter(|_| tracker.record_file(Path::new("go/file"), 1, &config).is_ok())
            .count();

        prop_assert_eq!(accepted, max_files.min(num_files));
        prop_assert_eq!(tracker.entries(), max_files.min(num_files));
    }

    /// Single-file ceiling is inclusive and leaves no trace when it trips.
    #[test]
    fn prop_quota_file_size_enforcement(
        max_file_size in 1000u64..100_000,
        file_size in 0u64..200_000
    ) {
        let mut tracker = QuotaTracker::new();
        let config = InstallConfig::default().with_max_file_size(max_file_size);

        let result = tracker.record_file(Path::new("go/file"), file_size, &config);

        if file_size <= max_file_size {
            prop_assert!(result.is_ok());
            prop_assert_eq!(tracker.declared_bytes(), file_size);
        } else {
            prop_assert!(matches!(
                result,
                Err(InstallError::QuotaExceeded {
                    resource: QuotaResource::FileSize { .. },
                    ..
                })
            ), "expected QuotaExceeded(FileSize), got {:?}", result);
            prop_assert_eq!(tracker.declared_bytes(), 0);
            prop_assert_eq!(tracker.entries(), 0);
        }
    }

    // ========================================================================
    // BOUNDED COPY PROPERTY TESTS
    // ========================================================================

    /// A stream that matches its declared size is copied intact.
    #[test]
    fn prop_bounded_copy_exact(data in prop::collection::vec(any::<u8>(), 0..100_000)) {
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();

        let copied = copy_bounded(
            &mut Cursor::new(&data),
            &mut output,
            data.len() as u64,
            &mut buffer,
            Path::new("go/file"),
        );

        prop_assert_eq!(copied.unwrap(), data.len() as u64);
        prop_assert_eq!(output, data);
    }

    /// Never more than the declared size reaches the writer.
    #[test]
    fn prop_bounded_copy_never_exceeds_declared(
        data in prop::collection::vec(any::<u8>(), 1..50_000),
        declared_fraction in 0.0f64..1.0
    ) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let declared = (data.len() as f64 * declared_fraction) as u64;
        prop_assume!(declared < data.len() as u64);

        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let result = copy_bounded(
            &mut Cursor::new(&data),
            &mut output,
            declared,
            &mut buffer,
            Path::new("go/file"),
        );

        prop_assert!(matches!(result, Err(InstallError::InvalidArchive(_))));
        prop_assert!(output.len() as u64 <= declared);
    }
}

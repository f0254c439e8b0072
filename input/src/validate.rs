//! Type and size policy for incoming files.
//!
//! Validation looks at metadata only and never reads file contents, so it
//! always finishes before any decode starts.

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::file::RawFile;

/// Checks a file against the configured policy.
///
/// The type check runs first: a 20 MiB text file is reported as the wrong
/// type, not as too large.
pub fn validate(file: &dyn RawFile, config: &IntakeConfig) -> Result<(), IntakeError> {
    let mime_type = file.mime_type();
    if !mime_type.starts_with(&config.accepted_type_prefix) {
        return Err(IntakeError::InvalidType { mime_type });
    }

    let size = file.size();
    if size > config.max_file_size {
        return Err(IntakeError::TooLarge {
            size,
            limit: config.max_file_size,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::MemoryFile;
    use proptest::prelude::*;

    fn file(mime: &str, size: u64) -> MemoryFile {
        MemoryFile::new("f", mime, Vec::new()).with_reported_size(size)
    }

    #[test]
    fn accepts_image_at_exact_limit() {
        let config = IntakeConfig::default();
        assert_eq!(validate(&file("image/png", 10_485_760), &config), Ok(()));
    }

    #[test]
    fn rejects_one_byte_over_limit() {
        let config = IntakeConfig::default();
        assert_eq!(
            validate(&file("image/jpeg", 10_485_761), &config),
            Err(IntakeError::TooLarge {
                size: 10_485_761,
                limit: 10_485_760,
            })
        );
    }

    #[test]
    fn empty_type_is_not_an_image() {
        let config = IntakeConfig::default();
        assert!(matches!(
            validate(&file("", 10), &config),
            Err(IntakeError::InvalidType { .. })
        ));
    }

    #[test]
    fn type_is_checked_before_size() {
        let config = IntakeConfig::default();
        let err = validate(&file("application/pdf", u64::MAX), &config)
            .expect_err("pdf must be refused");
        assert_eq!(err.to_string(), "Please upload an image file");
    }

    proptest! {
        #[test]
        fn non_image_types_are_refused(mime in "[a-z]{1,12}/[a-z0-9.+-]{1,12}", size in 0u64..20_000_000) {
            prop_assume!(!mime.starts_with("image/"));
            let result = validate(&file(&mime, size), &IntakeConfig::default());
            prop_assert_eq!(result, Err(IntakeError::InvalidType { mime_type: mime }));
        }

        #[test]
        fn oversized_images_are_refused(subtype in "[a-z]{1,8}", size in 10_485_761u64..u64::MAX) {
            let result = validate(&file(&format!("image/{subtype}"), size), &IntakeConfig::default());
            prop_assert!(matches!(result, Err(IntakeError::TooLarge { .. })), "expected TooLarge, got {:?}", result);
        }

        #[test]
        fn small_images_pass(subtype in "[a-z]{1,8}", size in 0u64..=10_485_760) {
            let result = validate(&file(&format!("image/{subtype}"), size), &IntakeConfig::default());
            prop_assert_eq!(result, Ok(()));
        }
    }
}

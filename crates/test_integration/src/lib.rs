#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]

#[cfg(test)]
pub mod runner;
#[cfg(test)]
pub mod test_constants;
#[cfg(test)]
pub mod test_helpers;

#[cfg(test)]
mod test_runner {
    use crate::runner::context::test_context::TestContext;
    use crate::runner::orchestration_utils::setup_tracing_and_panic_handling;
    use crate::tests::test_albums::{
        test_album_cover_and_photo_count, test_album_lifecycle, test_album_photo_management,
    };
    use crate::tests::test_auth::{
        test_delete_account, test_invalid_login, test_login, test_protected_routes_need_token,
        test_register, test_register_validation, test_second_register_attempt,
    };
    use crate::tests::test_homepage::test_homepage;
    use crate::tests::test_photos::{
        test_bulk_upload, test_photo_owner_only_changes, test_photo_upload_and_retrieve,
        test_upload_rejects_non_images,
    };
    use crate::tests::test_root::{test_health_endpoint, test_root_endpoint};
    use crate::tests::test_sharing::{
        test_concurrent_duplicate_grants, test_grant_removal_and_cascade, test_grant_update_rules,
        test_share_photo, test_share_validation,
    };
    use crate::execute_suite;
    use color_eyre::Result;

    #[tokio::test(flavor = "multi_thread")]
    async fn integration_suite() -> Result<()> {
        setup_tracing_and_panic_handling();
        let context = TestContext::new().await?;

        execute_suite!(
            &context,
            [
                // -- Root --
                test_root_endpoint,
                test_health_endpoint,
                // -- Auth --
                test_register,
                test_second_register_attempt,
                test_register_validation,
                test_login,
                test_invalid_login,
                test_protected_routes_need_token,
                // -- Photos --
                test_photo_upload_and_retrieve,
                test_upload_rejects_non_images,
                test_bulk_upload,
                test_photo_owner_only_changes,
                // -- Albums --
                test_album_lifecycle,
                test_album_cover_and_photo_count,
                test_album_photo_management,
                // -- Sharing --
                test_share_photo,
                test_share_validation,
                test_concurrent_duplicate_grants,
                test_grant_update_rules,
                test_grant_removal_and_cascade,
                // -- Homepage --
                test_homepage,
                // -- Account deletion --
                test_delete_account,
            ]
        );

        Ok(())
    }
}

use crate::api;
use crate::domain::{
    Component, ComponentSummary, CreateComponentInput, CreateKitInput, CreateLoanInput,
    ItemStatus, Kit, KitComponent, KitMemberInput, Loan, LoanStatus, UpdateComponentInput,
    UpdateKitInput, UpdateLoanInput,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::health::root,
        api::component::list_components,
        api::component::get_component,
        api::component::create_component,
        api::component::update_component,
        api::component::delete_component,
        api::kit::list_kits,
        api::kit::get_kit,
        api::kit::create_kit,
        api::kit::update_kit,
        api::kit::delete_kit,
        api::kit::set_kit_component,
        api::kit::remove_kit_component,
        api::loan::list_loans,
        api::loan::list_active_loans,
        api::loan::get_loan,
        api::loan::create_loan,
        api::loan::return_loan,
        api::loan::update_loan,
    ),
    components(
        schemas(
            ItemStatus,
            LoanStatus,
            Component,
            ComponentSummary,
            CreateComponentInput,
            UpdateComponentInput,
            Kit,
            KitComponent,
            KitMemberInput,
            CreateKitInput,
            UpdateKitInput,
            api::kit::SetKitComponentRequest,
            Loan,
            CreateLoanInput,
            UpdateLoanInput,
        )
    ),
    tags(
        (name = "components", description = "Single lab items"),
        (name = "kits", description = "Bundles of components lent as a unit"),
        (name = "loans", description = "Loan lifecycle")
    )
)]
pub struct ApiDoc;

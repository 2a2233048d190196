//! Client-side view state for admin data tables.
//!
//! Everything here is pure: queries, results, drafts and confirmation gates
//! carry no I/O. Controllers in the application crate own and mutate them.

#![forbid(unsafe_code)]

mod binding;
mod confirmation;
mod draft;
mod field;
mod list_query;
mod list_result;
mod record;
mod resources;

pub use binding::{
    Payload, ResourceBinding, number_value, require_one_of, required_scope,
};
pub use confirmation::ConfirmationGate;
pub use draft::{DraftMode, DraftValue, MutationDraft};
pub use field::{
    LOCAL_INPUT_FORMAT, join_list, local_input_to_rfc3339, normalize_code,
    rfc3339_to_local_input, split_list,
};
pub use list_query::{DEFAULT_PAGE_SIZE, FilterKey, ListQuery, ListQueryPatch};
pub use list_result::{ListResult, clamp_page, total_pages};
pub use record::{RecordId, ResourceRecord};
pub use resources::{
    AvatarBorder, AvatarBorderBinding, Badge, BadgeBinding, GACHA_RARITIES, GachaItem,
    GachaItemBinding, REDEEM_CODE_STATUSES, RedeemCode, RedeemCodeBinding, VipPlan,
    VipPlanBinding,
};

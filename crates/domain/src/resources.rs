//! Concrete admin resources bound to the generic controllers.

mod avatar_border;
mod badge;
mod gacha_item;
mod redeem_code;
mod vip_plan;

pub use avatar_border::{AvatarBorder, AvatarBorderBinding};
pub use badge::{Badge, BadgeBinding};
pub use gacha_item::{GACHA_RARITIES, GachaItem, GachaItemBinding};
pub use redeem_code::{REDEEM_CODE_STATUSES, RedeemCode, RedeemCodeBinding};
pub use vip_plan::{VipPlan, VipPlanBinding};

pub mod stage0_precondition;
pub mod stage1_submit;
pub mod stage2_poll;
pub mod stage3_extract;
pub mod stage4_render;

pub use stage0_precondition::*;
pub use stage1_submit::*;
pub use stage2_poll::*;
pub use stage3_extract::*;
pub use stage4_render::*;

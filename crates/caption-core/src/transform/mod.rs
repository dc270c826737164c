//! Overlay transform: state, pure update functions and rotation snapping.

mod snap;
mod state;
mod update;

pub use snap::{is_on_axis, snap_to_axis, RotationSnap};
pub use state::{TransformDelta, TransformState};
pub use update::{
    angle_delta, apply_move, apply_scale_rotate, clamp_move_delta, clamp_scale_factor,
    handle_scale_rotate, pinch_factor, pointer_angle, pointer_distance, Limits,
};

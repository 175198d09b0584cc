use super::DeviceProfile;
use crate::coords::TouchAxes;

/// reMarkable 1 device profile.
///
/// The touch controller reports a coarse 768×1024 grid with both axes
/// running against the display.
pub const RM1: DeviceProfile = DeviceProfile {
    name: "reMarkable 1",

    pen_x_max: 20967,
    pen_y_max: 15725,

    touch_x_max: 767,
    touch_y_max: 1023,
    touch_axes: TouchAxes::BothInverted,
};

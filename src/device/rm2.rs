use super::DeviceProfile;
use crate::coords::TouchAxes;

pub const RM2: DeviceProfile = DeviceProfile {
    name: "reMarkable 2",

    // Pen digitizer ranges (from device dumps)
    pen_x_max: 20966,
    pen_y_max: 15725,

    // Touch screen matches the 1404×1872 panel, Y=0 at the bottom
    touch_x_max: 1403,
    touch_y_max: 1871,
    touch_axes: TouchAxes::YInverted,
};

/// Parameter bytes sent with the controller commands.
///
/// The RAM window and counter values are the ones the panel was brought up
/// with. They do not follow from [`WIDTH`](super::WIDTH) and
/// [`HEIGHT`](super::HEIGHT) and must be sent as they are.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Auto Write RAM (0x46 / 0x47) pattern
    pub const AUTO_WRITE_PATTERN: u8 = 0xF7;

    // Booster Soft Start (0x0C), phases 1-3, duration and strength
    pub const SOFT_START: [u8; 5] = [0xAE, 0xC7, 0xC3, 0xC0, 0x40];

    // Driver Output Control (0x01): MUX lines low, high, gate scan
    pub const DRIVER_OUTPUT: [u8; 3] = [0xAF, 0x02, 0x01];

    // Data Entry Mode (0x11)
    pub const DATA_ENTRY_DECRY_INCRX: u8 = 0x01; // Y decrement, X increment

    // RAM X start 0x0000, end 0x036F
    pub const RAM_X_WINDOW: [u8; 4] = [0x00, 0x00, 0x6F, 0x03];
    // RAM Y start 0x02AF, end 0x0000
    pub const RAM_Y_WINDOW: [u8; 4] = [0xAF, 0x02, 0x00, 0x00];

    // RAM address counters
    pub const RAM_X_ORIGIN: [u8; 2] = [0x00, 0x00];
    pub const RAM_Y_ORIGIN: [u8; 2] = [0xAF, 0x02];

    // Border Waveform Control (0x3C)
    pub const BORDER_WAVEFORM_LUT1_WHITE: u8 = 0x01;

    // Temperature Sensor Control (0x18)
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Display Update Control 2 (0x22)
    pub const DISPLAY_UPDATE_LOAD_TEMP_WAVEFORM: u8 = 0xB1;
    pub const DISPLAY_UPDATE_BUILTIN_LUT: u8 = 0xC7;

    // Deep Sleep Mode (0x10)
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01;

    // Plane fill values, black RAM bit 1 = white, red RAM bit 0 = no red
    pub const BW_RAM_WHITE: u8 = 0xFF;
    pub const RED_RAM_NONE: u8 = 0x00;
}

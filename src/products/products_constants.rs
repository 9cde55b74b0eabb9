/// Maximum number of channel slots a product can hold
pub const MAX_CHANNEL_SLOTS: i32 = 6;

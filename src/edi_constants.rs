pub const UNA_TAG: &str = "UNA";
pub const UNB_TAG: &str = "UNB";
pub const UNZ_TAG: &str = "UNZ";

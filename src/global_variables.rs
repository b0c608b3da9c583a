// Lane buffer bound (cars waiting per entry lane)
pub const LANE_CAPACITY: usize = 10;

// Number of entry lanes and intersection quadrants
pub const LANE_COUNT: usize = 4;
pub const QUADRANT_COUNT: usize = 4;

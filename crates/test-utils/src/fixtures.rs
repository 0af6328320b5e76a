//! Common test fixtures for occupancy dataset tests.

use crate::SyntheticRow;

/// Day type label for weekdays.
pub const WEEKDAY: &str = "平日";

/// Day type label for weekends and holidays.
pub const HOLIDAY: &str = "假日";

/// Months present in the production dataset.
pub const MONTHS: [u32; 4] = [202412, 202502, 202505, 202508];

/// Grid cells with known coordinates.
pub mod cells {
    /// Documented sample cell near Taipei 101 (25.033311, 121.543653).
    pub const SAMPLE: (u32, u32) = (7165, 7152);

    /// Cells in a small block around the sample cell.
    pub const BLOCK: [(u32, u32); 4] = [(7165, 7152), (7166, 7152), (7165, 7153), (7166, 7153)];
}

/// The documented sample row of the dataset (December 2024, midnight, holiday).
pub fn sample_row() -> SyntheticRow {
    SyntheticRow {
        month: 202412,
        gx: 7165,
        gy: 7152,
        hour: 0,
        day_type: HOLIDAY.to_string(),
        metrics: [20.67, 1.0, 7.0, 12.67],
        gender: [54.42, 45.58],
        age: [
            1.43, 3.49, 6.68, 6.59, 11.90, 4.84, 11.92, 8.46, 17.43, 27.27,
        ],
    }
}

/// Two rows sharing one time slice with total-user weights 10 and 30.
///
/// Weighted male share is `(10*60 + 30*50) / 40 = 52.5`.
pub fn weighted_pair() -> [SyntheticRow; 2] {
    [
        SyntheticRow::new(202412, 7165, 7152, 14, WEEKDAY)
            .with_weight(10.0)
            .with_gender(60.0, 40.0),
        SyntheticRow::new(202412, 7166, 7152, 14, WEEKDAY)
            .with_weight(30.0)
            .with_gender(50.0, 50.0),
    ]
}

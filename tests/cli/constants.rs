// Integration tests for src/cli/constants.rs: display level and macros

use tracy_lz4::cli::constants::{display_level, level_from_flags, set_display_level};
use tracy_lz4::displaylevel;

#[test]
fn display_level_round_trip() {
    let prev = display_level();
    set_display_level(0);
    assert_eq!(display_level(), 0);
    // Silent at level 0; must not panic.
    displaylevel!(1, "not shown {}\n", 1);
    set_display_level(prev);
}

#[test]
fn quiet_floor_and_verbose_ceiling() {
    assert_eq!(level_from_flags(0, 200), 0);
    assert_eq!(level_from_flags(200, 0), 4);
}

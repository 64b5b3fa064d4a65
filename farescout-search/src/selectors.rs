//! Selector inventory for the target site's search form and results page.
//!
//! These are brittle by nature: they mirror the site's current markup and
//! nothing else. Keeping them in one place localises the damage when the
//! site changes.

pub const ORIGIN_INPUT: &str = "#anguScroll_value";
pub const DESTINATION_INPUT: &str = "input[placeholder='Select Destination City']";
pub const DATE_TRIGGER: &str = "input[placeholder='Select Journey Date']";
pub const SUBMIT_BUTTON: &str = "input[type='submit'][ng-click='Search(false)']";

/// Calendar cell for the requested day-of-month, skipping disabled cells.
pub fn day_cell(day: u32) -> String {
    format!("td[data-day='{day}']:not(.disabled)")
}

// Results page.

pub const CARD: &str = ".card-body";
pub const AIRLINE: &str = "p.h6.responsive-bold.mb-0";
pub const FLIGHT_NUMBER: &str = "p.mb-0.d-inline.d-lg-block";
/// Shared by both legs; the second match within a card is the destination.
pub const LEG_CODE: &str = ".text-extra-dark.font-weight-600.mb-0.text-nowrap";
pub const LEG_TIME: &str = ".text-mild-dark.d-block.h4";
pub const LEG_DATE: &str = ".hide-on-small-and-down.mb-0.d-block";
pub const LEG_CITY: &str = ".font-weight-normal.small.mb-0.text-nowrap.text-light-dark";
pub const ORIGIN_TERMINAL: &str = ".font-weight-normal.small.text-light-dark";
pub const DURATION: &str = ".responsive-dblock.text-extra-dark.font-weight-bold";
pub const STOPS: &str = ".onechangecolor.font-weight-bold.responsive-dblock";
/// Attribute on the stops element carrying the layover tooltip.
pub const LAYOVER_ATTR: &str = "data-balloon";
pub const PRICE: &str =
    ".text-gray.roboto_font.mb-0.text-primary.h4, .font-weight-600.text-gray.lbl-bold.roboto_font.mb-0.lbl-huge";
pub const PROMO: &str = ".lbl-PromoFare.mb-0";
pub const BAGGAGE: &str = ".action-bar .text";
pub const SEATS: &str = ".action-bar .text.ng-binding";
pub const NEXT_DAY: &str = ".text-danger";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_cell_embeds_the_day_of_month() {
        assert_eq!(day_cell(18), "td[data-day='18']:not(.disabled)");
        assert_eq!(day_cell(1), "td[data-day='1']:not(.disabled)");
    }
}

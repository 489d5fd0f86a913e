use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use proptest::prelude::*;
use schedule_engine::{has_conflict, month_grid, occurs_on, Event, LocalClock, Recurrence};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..60_000).prop_map(|d| epoch() + Duration::days(d))
}

fn anchored(date: NaiveDate, hour: u32, minute: u32, recurrence: Recurrence) -> Event {
    let anchor: DateTime<Utc> = Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap());
    Event::new("anchor", "Anchor", anchor).with_recurrence(recurrence)
}

proptest! {
    #[test]
    fn one_time_occurs_on_anchor_day_only(
        anchor in arb_date(), hour in 0u32..24, minute in 0u32..60, offset in -800i64..800
    ) {
        let event = anchored(anchor, hour, minute, Recurrence::None);
        let day = anchor + Duration::days(offset);
        prop_assert_eq!(occurs_on(&event, day, &LocalClock::default()), offset == 0);
    }

    #[test]
    fn daily_occurs_from_anchor_on(
        anchor in arb_date(), hour in 0u32..24, offset in -800i64..800
    ) {
        let event = anchored(anchor, hour, 0, Recurrence::Daily);
        let day = anchor + Duration::days(offset);
        prop_assert_eq!(occurs_on(&event, day, &LocalClock::default()), offset >= 0);
    }

    #[test]
    fn weekly_occurs_every_seventh_day(
        anchor in arb_date(), hour in 0u32..24, offset in -800i64..800
    ) {
        let event = anchored(anchor, hour, 30, Recurrence::Weekly);
        let day = anchor + Duration::days(offset);
        prop_assert_eq!(
            occurs_on(&event, day, &LocalClock::default()),
            offset >= 0 && offset % 7 == 0
        );
    }

    #[test]
    fn custom_occurs_every_fourteenth_day(
        anchor in arb_date(), hour in 0u32..24, offset in -800i64..800
    ) {
        let event = anchored(anchor, hour, 15, Recurrence::Custom);
        let day = anchor + Duration::days(offset);
        prop_assert_eq!(
            occurs_on(&event, day, &LocalClock::default()),
            offset >= 0 && offset % 14 == 0
        );
    }

    #[test]
    fn monthly_and_yearly_never_match_before_anchor(
        anchor in arb_date(), back in 1i64..2000
    ) {
        let day = anchor - Duration::days(back);
        for recurrence in [Recurrence::Monthly, Recurrence::Yearly] {
            let event = anchored(anchor, 12, 0, recurrence);
            prop_assert!(!occurs_on(&event, day, &LocalClock::default()));
        }
    }

    #[test]
    fn month_grid_is_whole_sunday_first_weeks(
        year in 1900i32..2200, month in 1u32..=12, day in 1u32..=28
    ) {
        let reference = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let grid = month_grid(reference);
        let dates: Vec<NaiveDate> = grid.dates().collect();

        prop_assert_eq!(dates.len() % 7, 0);
        prop_assert!((4..=6).contains(&grid.rows().len()));
        prop_assert_eq!(dates[0].weekday(), Weekday::Sun);
        prop_assert_eq!(dates[dates.len() - 1].weekday(), Weekday::Sat);
        for pair in dates.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], Duration::days(1));
        }

        let in_month = dates.iter().filter(|d| grid.is_in_month(**d)).count();
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        let days_in_month = (1..=31)
            .filter(|d| NaiveDate::from_ymd_opt(year, month, *d).is_some())
            .count();
        prop_assert_eq!(in_month, days_in_month);
        prop_assert!(dates.contains(&first));
    }

    #[test]
    fn an_event_never_conflicts_with_itself(
        date in arb_date(), hour in 0u32..24, minute in 0u32..60, recurring in any::<bool>()
    ) {
        let recurrence = if recurring { Recurrence::Daily } else { Recurrence::None };
        let event = anchored(date, hour, minute, recurrence);
        let events = vec![event.clone()];
        prop_assert!(!has_conflict(&events, &event, event.date_time, &LocalClock::default()));
    }

    #[test]
    fn daily_event_blocks_every_later_minute(
        anchor in arb_date(), later in 0i64..500, hour in 0u32..24, minute in 0u32..60
    ) {
        let daily = anchored(anchor, 23, 59, Recurrence::Daily);
        let start = Utc.with_ymd_and_hms(1969, 1, 1, 0, 0, 0).unwrap();
        let mover = Event::new("mover", "Mover", start);
        let events = vec![daily, mover.clone()];
        let day = anchor + Duration::days(later);
        let proposed = Utc.from_utc_datetime(&day.and_hms_opt(hour, minute, 0).unwrap());
        prop_assert!(has_conflict(&events, &mover, proposed, &LocalClock::default()));
    }
}

use crate::data::schedule::{ALL_DAYS, WEEKDAYS, WEEKEND};
use crate::data::{OperatingSchedule, TimeBound, ToggleKey};
use chrono::NaiveTime;

/// Applies one toggle-button press to `prev` and returns the new schedule.
///
/// Group buttons force their member days on or off. A single-day press
/// clears every group flag and then re-derives only `all_days`; `weekdays`
/// and `weekend` are never recomputed from the individual days.
pub fn apply(prev: &OperatingSchedule, key: ToggleKey) -> OperatingSchedule {
    let mut next = *prev;
    match key {
        ToggleKey::AllDays => {
            next.all_days = !prev.all_days;
            if next.all_days {
                next.days.set_all(&ALL_DAYS, true);
                next.weekdays = false;
                next.weekend = false;
            } else {
                next.days.set_all(&ALL_DAYS, false);
            }
        }
        ToggleKey::Weekdays => {
            next.weekdays = !prev.weekdays;
            if next.weekdays {
                next.days.set_all(&WEEKDAYS, true);
                next.days.set_all(&WEEKEND, false);
                next.all_days = false;
                next.weekend = false;
            } else {
                next.days.set_all(&WEEKDAYS, false);
            }
        }
        ToggleKey::Weekend => {
            next.weekend = !prev.weekend;
            if next.weekend {
                next.days.set_all(&WEEKEND, true);
                next.days.set_all(&WEEKDAYS, false);
                next.all_days = false;
                next.weekdays = false;
            } else {
                next.days.set_all(&WEEKEND, false);
            }
        }
        ToggleKey::Day(day) => {
            next.days.toggle(day);
            next.all_days = false;
            next.weekdays = false;
            next.weekend = false;
            if next.days.is_full() {
                next.all_days = true;
            }
        }
    }
    next
}

/// Replaces one end of the opening window. `to` may end up before `from`.
pub fn set_time_bound(
    prev: &OperatingSchedule,
    bound: TimeBound,
    value: NaiveTime,
) -> OperatingSchedule {
    with_bound(prev, bound, Some(value))
}

/// Unsets one end of the opening window, as an emptied time input does.
pub fn clear_time_bound(prev: &OperatingSchedule, bound: TimeBound) -> OperatingSchedule {
    with_bound(prev, bound, None)
}

fn with_bound(
    prev: &OperatingSchedule,
    bound: TimeBound,
    value: Option<NaiveTime>,
) -> OperatingSchedule {
    let mut next = *prev;
    match bound {
        TimeBound::From => next.from = value,
        TimeBound::To => next.to = value,
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schedule::DaySet;
    use chrono::Weekday;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn schedule_with(days: &[Weekday]) -> OperatingSchedule {
        let mut s = OperatingSchedule::default();
        s.days.set_all(days, true);
        s
    }

    fn press(s: OperatingSchedule, keys: &[ToggleKey]) -> OperatingSchedule {
        keys.iter().fold(s, |acc, k| apply(&acc, *k))
    }

    /// A spread of starting points: empty, each group, some partial sets,
    /// and inconsistent flag combinations.
    fn sample_states() -> Vec<OperatingSchedule> {
        let empty = OperatingSchedule::default();
        let mut odd = schedule_with(&[Weekday::Mon, Weekday::Sun]);
        odd.weekdays = true;
        let mut stale_weekend = schedule_with(&[Weekday::Sat]);
        stale_weekend.weekend = true;
        vec![
            empty,
            apply(&empty, ToggleKey::AllDays),
            apply(&empty, ToggleKey::Weekdays),
            apply(&empty, ToggleKey::Weekend),
            schedule_with(&[Weekday::Tue]),
            schedule_with(&[Weekday::Wed, Weekday::Sat]),
            odd,
            stale_weekend,
        ]
    }

    #[test]
    fn test_all_days_on_selects_everything() {
        let s = apply(&OperatingSchedule::default(), ToggleKey::AllDays);
        assert!(s.all_days);
        assert!(s.days.is_full());
        assert!(!s.weekdays);
        assert!(!s.weekend);
    }

    #[test]
    fn test_all_days_on_clears_other_groups() {
        let s = press(OperatingSchedule::default(), &[ToggleKey::Weekend, ToggleKey::AllDays]);
        assert!(s.all_days);
        assert!(!s.weekend);
        assert!(s.days.is_full());
    }

    #[test]
    fn test_all_days_off_clears_every_day() {
        let s = press(OperatingSchedule::default(), &[ToggleKey::AllDays, ToggleKey::AllDays]);
        assert!(!s.all_days);
        assert!(s.days.is_empty());
    }

    #[test]
    fn test_all_days_off_leaves_group_flags_alone() {
        let mut s = schedule_with(&[Weekday::Mon]);
        s.all_days = true;
        s.weekend = true;
        let next = apply(&s, ToggleKey::AllDays);
        assert!(!next.all_days);
        assert!(next.weekend);
        assert!(next.days.is_empty());
    }

    #[test]
    fn test_weekdays_on_selects_mon_to_fri_only() {
        let s = press(OperatingSchedule::default(), &[ToggleKey::AllDays, ToggleKey::Weekdays]);
        assert!(s.weekdays);
        assert!(!s.all_days);
        assert!(!s.weekend);
        for day in WEEKDAYS {
            assert!(s.is_open_on(day));
        }
        assert!(!s.is_open_on(Weekday::Sat));
        assert!(!s.is_open_on(Weekday::Sun));
    }

    #[test]
    fn test_weekdays_off_keeps_weekend_days() {
        let mut s = apply(&OperatingSchedule::default(), ToggleKey::Weekdays);
        s.days.set(Weekday::Sat, true);
        let next = apply(&s, ToggleKey::Weekdays);
        assert!(!next.weekdays);
        assert_eq!(next.days, DaySet::from(vec![Weekday::Sat]));
    }

    #[test]
    fn test_weekend_on_selects_sat_sun_only() {
        let s = press(OperatingSchedule::default(), &[ToggleKey::Weekdays, ToggleKey::Weekend]);
        assert!(s.weekend);
        assert!(!s.weekdays);
        assert_eq!(s.days, DaySet::from(vec![Weekday::Sat, Weekday::Sun]));
    }

    #[test]
    fn test_weekend_off_keeps_weekdays() {
        let mut s = apply(&OperatingSchedule::default(), ToggleKey::Weekend);
        s.days.set(Weekday::Mon, true);
        let next = apply(&s, ToggleKey::Weekend);
        assert!(!next.weekend);
        assert_eq!(next.days, DaySet::from(vec![Weekday::Mon]));
    }

    #[test]
    fn test_day_toggle_from_all_days_flips_only_that_day() {
        for day in ALL_DAYS {
            let full = apply(&OperatingSchedule::default(), ToggleKey::AllDays);
            let next = apply(&full, ToggleKey::Day(day));
            assert!(!next.all_days);
            for other in ALL_DAYS {
                assert_eq!(next.is_open_on(other), other != day, "{day} pressed, checking {other}");
            }
        }
    }

    /// `all_days` set but the day set or other flags disagree with it.
    fn inconsistent_all_days_states() -> Vec<OperatingSchedule> {
        let mut partial = schedule_with(&[Weekday::Mon, Weekday::Wed, Weekday::Fri]);
        partial.all_days = true;
        let mut stale_weekend = apply(&OperatingSchedule::default(), ToggleKey::AllDays);
        stale_weekend.weekend = true;
        let mut empty = OperatingSchedule::default();
        empty.all_days = true;
        empty.weekdays = true;
        let mut six = schedule_with(&ALL_DAYS[..6]);
        six.all_days = true;
        vec![partial, stale_weekend, empty, six]
    }

    #[test]
    fn test_day_toggle_from_inconsistent_all_days_flips_only_that_day() {
        for start in inconsistent_all_days_states() {
            for day in ALL_DAYS {
                let next = apply(&start, ToggleKey::Day(day));
                for other in ALL_DAYS {
                    let expected = start.is_open_on(other) != (other == day);
                    assert_eq!(next.is_open_on(other), expected, "{day} pressed, checking {other}");
                }
                assert!(!next.weekdays);
                assert!(!next.weekend);
                assert_eq!(next.all_days, next.days.is_full(), "{day} pressed from {start:?}");
            }
        }
    }

    #[test]
    fn test_day_toggle_completing_the_week_keeps_all_days() {
        let mut six = schedule_with(&ALL_DAYS[..6]);
        six.all_days = true;
        let next = apply(&six, ToggleKey::Day(Weekday::Sun));
        assert!(next.days.is_full());
        assert!(next.all_days);

        let next = apply(&six, ToggleKey::Day(Weekday::Mon));
        assert!(!next.all_days);
        assert!(!next.is_open_on(Weekday::Mon));
    }

    #[test]
    fn test_day_toggle_clears_group_flags() {
        let s = apply(&OperatingSchedule::default(), ToggleKey::Weekdays);
        let next = apply(&s, ToggleKey::Day(Weekday::Sat));
        assert!(!next.weekdays);
        assert!(!next.weekend);
        assert!(!next.all_days);
        assert_eq!(next.days.iter().count(), 6);
    }

    #[test]
    fn test_individual_days_promote_to_all_days() {
        let order = [
            Weekday::Thu,
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Sat,
            Weekday::Wed,
            Weekday::Fri,
            Weekday::Tue,
        ];
        let mut s = OperatingSchedule::default();
        for (i, day) in order.iter().enumerate() {
            s = apply(&s, ToggleKey::Day(*day));
            assert_eq!(s.all_days, i == order.len() - 1);
        }
        assert!(s.days.is_full());

        let next = apply(&s, ToggleKey::Day(Weekday::Wed));
        assert!(!next.all_days);
    }

    #[test]
    fn test_weekdays_flag_not_rederived_from_days() {
        let keys: Vec<ToggleKey> = WEEKDAYS.iter().map(|d| ToggleKey::Day(*d)).collect();
        let s = press(OperatingSchedule::default(), &keys);
        assert_eq!(s.days, DaySet::from(WEEKDAYS.to_vec()));
        assert!(!s.weekdays);

        let s = press(
            OperatingSchedule::default(),
            &[ToggleKey::Day(Weekday::Sat), ToggleKey::Day(Weekday::Sun)],
        );
        assert!(!s.weekend);
    }

    #[test]
    fn test_all_days_twice_restores_day_set() {
        for start in sample_states() {
            let twice = press(start, &[ToggleKey::AllDays, ToggleKey::AllDays]);
            if start.all_days {
                // Off then on: back to a full week.
                assert!(twice.days.is_full());
            } else {
                // On then off: every day cleared, which matches only an empty start.
                assert!(twice.days.is_empty());
            }
        }
    }

    #[test]
    fn test_all_days_twice_involution_on_consistent_states() {
        let empty = OperatingSchedule::default();
        let full = apply(&empty, ToggleKey::AllDays);
        for start in [empty, full] {
            let twice = press(start, &[ToggleKey::AllDays, ToggleKey::AllDays]);
            assert_eq!(twice.days, start.days);
        }
    }

    #[test]
    fn test_all_days_twice_drops_other_group_flag() {
        let start = apply(&OperatingSchedule::default(), ToggleKey::Weekend);
        let twice = press(start, &[ToggleKey::AllDays, ToggleKey::AllDays]);
        assert!(start.weekend);
        assert!(!twice.weekend);
    }

    #[test]
    fn test_apply_does_not_touch_hours() {
        for start in sample_states() {
            for key in ToggleKey::ALL {
                let next = apply(&start, key);
                assert_eq!(next.from, start.from);
                assert_eq!(next.to, start.to);
            }
        }
    }

    #[test]
    fn test_at_most_one_group_flag_after_day_toggle() {
        for start in sample_states() {
            for day in ALL_DAYS {
                let next = apply(&start, ToggleKey::Day(day));
                let flags = [next.all_days, next.weekdays, next.weekend];
                assert!(flags.iter().filter(|f| **f).count() <= 1);
                assert_eq!(next.all_days, next.days.is_full());
            }
        }
    }

    #[test]
    fn test_set_time_bound_allows_inverted_window() {
        let s = OperatingSchedule::default();
        let next = set_time_bound(&s, TimeBound::To, t(6, 0));
        assert_eq!(next.from, Some(t(9, 0)));
        assert_eq!(next.to, Some(t(6, 0)));
        let next = set_time_bound(&next, TimeBound::From, t(22, 15));
        assert_eq!(next.from, Some(t(22, 15)));
    }

    #[test]
    fn test_clear_time_bound_unsets_only_that_bound() {
        let s = OperatingSchedule::default();
        let next = clear_time_bound(&s, TimeBound::From);
        assert_eq!(next.from, None);
        assert_eq!(next.to, Some(t(21, 0)));
        assert!(!next.has_hours());
    }
}

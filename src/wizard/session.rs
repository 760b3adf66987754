use crate::calc::{hours, validation};
use crate::data::schedule::hh_mm;
use crate::data::{
    AppSettings, Attachment, ContactInfo, PropertyDetails, Record, ScheduleDetails, SizeTier,
    StepOutput, TimeBound, ToggleKey,
};
use crate::wizard::{Move, Step, View, WizardController, WizardError};
use chrono::NaiveTime;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// A discrete user action. Replay scripts are lists of these.
///
/// `submit_*` events first copy any fields they carry into the step's form
/// and then submit it; absent fields keep what the form already holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardEvent {
    SubmitContact {
        name: Option<String>,
        phone: Option<String>,
    },
    SubmitProperty {
        name: Option<String>,
        size: Option<SizeTier>,
        location: Option<String>,
    },
    Toggle(ToggleKey),
    SetTime {
        bound: TimeBound,
        #[serde(default, with = "hh_mm")]
        value: Option<NaiveTime>,
    },
    Attach(Attachment),
    Detach(usize),
    SubmitSchedule {
        total_units: Option<u32>,
        #[serde(default, with = "hh_mm")]
        from: Option<NaiveTime>,
        #[serde(default, with = "hh_mm")]
        to: Option<NaiveTime>,
        description: Option<String>,
    },
    Back,
}

impl WizardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::SubmitContact { .. } => "submit_contact",
            WizardEvent::SubmitProperty { .. } => "submit_property",
            WizardEvent::Toggle(_) => "toggle",
            WizardEvent::SetTime { .. } => "set_time",
            WizardEvent::Attach(_) => "attach",
            WizardEvent::Detach(_) => "detach",
            WizardEvent::SubmitSchedule { .. } => "submit_schedule",
            WizardEvent::Back => "back",
        }
    }

    /// The step on which this event makes sense; `None` for `Back`, which
    /// the transition table decides.
    fn home_step(&self) -> Option<Step> {
        match self {
            WizardEvent::SubmitContact { .. } => Some(Step::Contact),
            WizardEvent::SubmitProperty { .. } => Some(Step::Property),
            WizardEvent::Back => None,
            _ => Some(Step::Schedule),
        }
    }
}

/// The controller plus the per-screen form state a front end edits before
/// submitting. Every front end drives the wizard through `dispatch`.
#[derive(Debug, Clone)]
pub struct Session {
    controller: WizardController,
    contact: ContactInfo,
    property: PropertyDetails,
    schedule: ScheduleDetails,
    /// Staged on the schedule screen; never merged into the record.
    attachments: Vec<Attachment>,
}

impl Session {
    pub fn new(settings: &AppSettings) -> Self {
        let record = Record::with_schedule(settings.initial_schedule());
        let mut session = Session {
            controller: WizardController::new(record),
            contact: ContactInfo::default(),
            property: PropertyDetails::default(),
            schedule: ScheduleDetails::default(),
            attachments: Vec::new(),
        };
        session.load_form();
        session
    }

    pub fn step(&self) -> Step {
        self.controller.current_step()
    }

    pub fn record(&self) -> &Record {
        self.controller.record()
    }

    pub fn view(&self) -> View<'_> {
        self.controller.current_view()
    }

    pub fn contact_form(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn property_form(&self) -> &PropertyDetails {
        &self.property
    }

    pub fn schedule_form(&self) -> &ScheduleDetails {
        &self.schedule
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Applies one event. On error nothing in the controller has changed.
    pub fn dispatch(&mut self, event: WizardEvent) -> Result<Step, WizardError> {
        let step = self.step();
        if let Some(home) = event.home_step() {
            if home != step {
                return Err(WizardError::EventNotAvailable {
                    event: event.name(),
                    step,
                });
            }
        }
        debug!(event = event.name(), step = %step, "dispatch");

        match event {
            WizardEvent::SubmitContact { name, phone } => {
                overwrite(&mut self.contact.name, name);
                overwrite(&mut self.contact.phone, phone);
                self.submit()
            }
            WizardEvent::SubmitProperty {
                name,
                size,
                location,
            } => {
                overwrite(&mut self.property.name, name);
                if size.is_some() {
                    self.property.size = size;
                }
                overwrite(&mut self.property.location, location);
                self.submit()
            }
            WizardEvent::Toggle(key) => {
                self.schedule.schedule = hours::apply(&self.schedule.schedule, key);
                Ok(step)
            }
            WizardEvent::SetTime { bound, value } => {
                self.set_time(bound, value);
                Ok(step)
            }
            WizardEvent::Attach(attachment) => {
                self.attach(attachment)?;
                Ok(step)
            }
            WizardEvent::Detach(index) => {
                if index >= self.attachments.len() {
                    return Err(WizardError::NoSuchAttachment(index));
                }
                let removed = self.attachments.remove(index);
                info!(name = %removed.name, "attachment removed");
                Ok(step)
            }
            WizardEvent::SubmitSchedule {
                total_units,
                from,
                to,
                description,
            } => {
                if let Some(units) = total_units {
                    self.schedule.total_units = units;
                }
                if let Some(t) = from {
                    self.set_time(TimeBound::From, Some(t));
                }
                if let Some(t) = to {
                    self.set_time(TimeBound::To, Some(t));
                }
                overwrite(&mut self.schedule.description, description);
                self.submit()
            }
            WizardEvent::Back => {
                let prev = self.controller.retreat()?;
                self.load_form();
                Ok(prev)
            }
        }
    }

    fn set_time(&mut self, bound: TimeBound, value: Option<NaiveTime>) {
        let current = &self.schedule.schedule;
        self.schedule.schedule = match value {
            Some(t) => hours::set_time_bound(current, bound, t),
            None => hours::clear_time_bound(current, bound),
        };
    }

    fn attach(&mut self, attachment: Attachment) -> Result<(), WizardError> {
        if let Err(e) = validation::validate_attachment(&attachment) {
            warn!(name = %attachment.name, error = %e, "attachment rejected");
            return Err(e.into());
        }
        info!(name = %attachment.name, size = attachment.size, "attachment staged");
        self.attachments.push(attachment);
        Ok(())
    }

    /// Runs the current step's gate over its form and, if it passes, hands
    /// the output to the controller.
    fn submit(&mut self) -> Result<Step, WizardError> {
        let output = match self.step() {
            Step::Contact => validation::validate_contact(&self.contact)
                .map(|_| StepOutput::Contact(self.contact.clone())),
            Step::Property => validation::validate_property(&self.property)
                .map(|_| StepOutput::Property(self.property.clone())),
            Step::Schedule => validation::validate_schedule(&self.schedule)
                .map(|_| StepOutput::Schedule(self.schedule.clone())),
            Step::Complete => {
                return Err(WizardError::NoTransition {
                    from: Step::Complete,
                    action: Move::Advance,
                });
            }
        };
        let output = output.inspect_err(|e| {
            warn!(step = %self.step(), error = %e, "submission rejected");
        })?;
        let next = self.controller.advance(output)?;
        self.load_form();
        Ok(next)
    }

    /// Seeds the form for the step just entered from the record.
    fn load_form(&mut self) {
        match self.controller.current_view() {
            View::Contact(c) => self.contact = c,
            View::Property(p) => self.property = p,
            View::Schedule(s) => {
                self.schedule = s;
                self.attachments.clear();
            }
            View::Complete(_) => {}
        }
    }
}

fn overwrite(field: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *field = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::ValidationError;
    use crate::data::attachment::MAX_ATTACHMENT_BYTES;
    use crate::data::persistence::from_yaml_str;
    use crate::data::schedule::{ALL_DAYS, WEEKDAYS};
    use chrono::Weekday;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn session() -> Session {
        Session::new(&AppSettings::default())
    }

    fn submit_contact(name: &str, phone: &str) -> WizardEvent {
        WizardEvent::SubmitContact {
            name: Some(name.to_string()),
            phone: Some(phone.to_string()),
        }
    }

    fn submit_property(name: &str, size: Option<SizeTier>, location: &str) -> WizardEvent {
        WizardEvent::SubmitProperty {
            name: Some(name.to_string()),
            size,
            location: Some(location.to_string()),
        }
    }

    fn submit_schedule(units: u32) -> WizardEvent {
        WizardEvent::SubmitSchedule {
            total_units: Some(units),
            from: Some(t(9, 0)),
            to: Some(t(21, 0)),
            description: None,
        }
    }

    fn at_schedule() -> Session {
        let mut s = session();
        s.dispatch(submit_contact("Asha", "9999900000")).unwrap();
        s.dispatch(submit_property("Lotus Inn", Some(SizeTier::Medium), "Pune"))
            .unwrap();
        s
    }

    #[test]
    fn test_onboarding_walkthrough() {
        let mut s = session();
        assert_eq!(s.dispatch(submit_contact("Asha", "9999900000")).unwrap(), Step::Property);
        assert_eq!(s.record().contact_name, "Asha");

        assert_eq!(
            s.dispatch(submit_property("Lotus Inn", Some(SizeTier::Medium), "Pune"))
                .unwrap(),
            Step::Schedule
        );

        s.dispatch(WizardEvent::Toggle(ToggleKey::Weekdays)).unwrap();
        let form = &s.schedule_form().schedule;
        assert!(form.weekdays);
        for day in WEEKDAYS {
            assert!(form.is_open_on(day));
        }
        assert!(!form.is_open_on(Weekday::Sat));
        assert!(!form.is_open_on(Weekday::Sun));

        assert_eq!(s.dispatch(submit_schedule(40)).unwrap(), Step::Complete);
        let r = s.record();
        assert_eq!(r.contact_phone, "9999900000");
        assert_eq!(r.property_name, "Lotus Inn");
        assert_eq!(r.property_size, Some(SizeTier::Medium));
        assert_eq!(r.property_location, "Pune");
        assert_eq!(r.total_units, 40);
        assert_eq!(r.schedule.from, Some(t(9, 0)));
        assert_eq!(r.schedule.to, Some(t(21, 0)));
        assert!(r.schedule.weekdays);
    }

    #[test]
    fn test_zero_units_stays_on_schedule() {
        let mut s = at_schedule();
        s.dispatch(WizardEvent::Toggle(ToggleKey::AllDays)).unwrap();
        let before = s.record().clone();
        let err = s.dispatch(submit_schedule(0)).unwrap_err();
        assert_eq!(err, WizardError::Validation(ValidationError::InvalidUnitCount));
        assert_eq!(s.step(), Step::Schedule);
        assert_eq!(s.record(), &before);
    }

    #[test]
    fn test_no_day_selected_rejected() {
        let mut s = at_schedule();
        let err = s.dispatch(submit_schedule(40)).unwrap_err();
        assert_eq!(err, WizardError::Validation(ValidationError::NoDaySelected));
        assert_eq!(s.step(), Step::Schedule);
    }

    #[test]
    fn test_cleared_hours_rejected() {
        let mut s = at_schedule();
        s.dispatch(WizardEvent::Toggle(ToggleKey::Weekend)).unwrap();
        s.dispatch(WizardEvent::SetTime {
            bound: TimeBound::From,
            value: None,
        })
        .unwrap();
        let err = s
            .dispatch(WizardEvent::SubmitSchedule {
                total_units: Some(10),
                from: None,
                to: None,
                description: None,
            })
            .unwrap_err();
        assert_eq!(err, WizardError::Validation(ValidationError::MissingHours));
    }

    #[test]
    fn test_blank_contact_rejected_and_form_kept() {
        let mut s = session();
        let err = s.dispatch(submit_contact("Asha", "  ")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(s.step(), Step::Contact);
        assert_eq!(s.contact_form().name, "Asha");
        assert_eq!(s.record().contact_name, "");
    }

    #[test]
    fn test_missing_size_rejected() {
        let mut s = session();
        s.dispatch(submit_contact("Asha", "1")).unwrap();
        let err = s.dispatch(submit_property("Lotus Inn", None, "Pune")).unwrap_err();
        assert_eq!(err, WizardError::Validation(ValidationError::MissingPropertyDetails));
        assert_eq!(s.step(), Step::Property);
    }

    #[test]
    fn test_back_then_resubmit_overwrites() {
        let mut s = at_schedule();
        assert_eq!(s.dispatch(WizardEvent::Back).unwrap(), Step::Property);
        assert_eq!(s.property_form().name, "Lotus Inn");
        s.dispatch(submit_property("Lotus Grand", Some(SizeTier::Large), "Goa"))
            .unwrap();
        assert_eq!(s.record().property_name, "Lotus Grand");
        assert_eq!(s.record().property_location, "Goa");
        assert_eq!(s.record().contact_name, "Asha");
    }

    #[test]
    fn test_back_from_first_step_rejected() {
        let mut s = session();
        assert!(matches!(
            s.dispatch(WizardEvent::Back),
            Err(WizardError::NoTransition { .. })
        ));
        assert_eq!(s.step(), Step::Contact);
    }

    #[test]
    fn test_schedule_events_gated_to_schedule_step() {
        let mut s = session();
        let err = s.dispatch(WizardEvent::Toggle(ToggleKey::AllDays)).unwrap_err();
        assert_eq!(
            err,
            WizardError::EventNotAvailable {
                event: "toggle",
                step: Step::Contact
            }
        );
        let err = s
            .dispatch(submit_property("Lotus Inn", Some(SizeTier::Small), "Pune"))
            .unwrap_err();
        assert!(matches!(err, WizardError::EventNotAvailable { .. }));
    }

    #[test]
    fn test_complete_step_accepts_nothing() {
        let mut s = at_schedule();
        s.dispatch(WizardEvent::Toggle(ToggleKey::AllDays)).unwrap();
        s.dispatch(submit_schedule(5)).unwrap();
        assert!(s.dispatch(WizardEvent::Back).is_err());
        assert!(s.dispatch(submit_contact("X", "1")).is_err());
        assert_eq!(s.step(), Step::Complete);
    }

    #[test]
    fn test_attachments_validated_and_not_merged() {
        let mut s = at_schedule();
        s.dispatch(WizardEvent::Attach(Attachment::new("bar.pdf", 2048, "application/pdf")))
            .unwrap();
        let err = s
            .dispatch(WizardEvent::Attach(Attachment::new(
                "huge.png",
                MAX_ATTACHMENT_BYTES + 1,
                "image/png",
            )))
            .unwrap_err();
        assert!(err.is_validation());
        let err = s
            .dispatch(WizardEvent::Attach(Attachment::new("notes.txt", 3, "text/plain")))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(s.attachments().len(), 1);

        s.dispatch(WizardEvent::Toggle(ToggleKey::Day(Weekday::Mon))).unwrap();
        s.dispatch(submit_schedule(12)).unwrap();
        let dump = s.record().render(crate::data::DumpFormat::Json).unwrap();
        assert!(!dump.contains("bar.pdf"));
    }

    #[test]
    fn test_detach_by_index() {
        let mut s = at_schedule();
        s.dispatch(WizardEvent::Attach(Attachment::new("a.pdf", 1, "application/pdf")))
            .unwrap();
        s.dispatch(WizardEvent::Attach(Attachment::new("b.png", 1, "image/png")))
            .unwrap();
        s.dispatch(WizardEvent::Detach(0)).unwrap();
        assert_eq!(s.attachments()[0].name, "b.png");
        assert_eq!(s.dispatch(WizardEvent::Detach(5)), Err(WizardError::NoSuchAttachment(5)));
    }

    #[test]
    fn test_reentering_schedule_drops_staged_attachments() {
        let mut s = at_schedule();
        s.dispatch(WizardEvent::Attach(Attachment::new("a.pdf", 1, "application/pdf")))
            .unwrap();
        s.dispatch(WizardEvent::Toggle(ToggleKey::Weekend)).unwrap();
        s.dispatch(WizardEvent::Back).unwrap();
        s.dispatch(submit_property("Lotus Inn", Some(SizeTier::Medium), "Pune"))
            .unwrap();
        assert!(s.attachments().is_empty());
        // Unsubmitted toggles are dropped too; the form reloads from the record.
        assert!(!s.schedule_form().schedule.weekend);
    }

    #[test]
    fn test_day_buttons_promote_to_all_days_in_form() {
        let mut s = at_schedule();
        for day in ALL_DAYS {
            s.dispatch(WizardEvent::Toggle(ToggleKey::Day(day))).unwrap();
        }
        assert!(s.schedule_form().schedule.all_days);
        s.dispatch(WizardEvent::SubmitSchedule {
            total_units: Some(3),
            from: None,
            to: None,
            description: Some("rooftop bar".to_string()),
        })
        .unwrap();
        assert!(s.record().schedule.all_days);
        assert_eq!(s.record().description, "rooftop bar");
    }

    #[test]
    fn test_set_time_event_allows_inverted_window() {
        let mut s = at_schedule();
        s.dispatch(WizardEvent::SetTime {
            bound: TimeBound::To,
            value: Some(t(6, 0)),
        })
        .unwrap();
        assert_eq!(s.schedule_form().schedule.to, Some(t(6, 0)));
        assert_eq!(s.schedule_form().schedule.from, Some(t(9, 0)));
    }

    #[test]
    fn test_configured_hours_seed_the_schedule() {
        let settings = AppSettings {
            default_open: Some(t(7, 0)),
            default_close: Some(t(19, 30)),
            ..AppSettings::default()
        };
        let s = Session::new(&settings);
        assert_eq!(s.record().schedule.from, Some(t(7, 0)));
        assert_eq!(s.record().schedule.to, Some(t(19, 30)));
    }

    #[test]
    fn test_events_deserialize_from_yaml() {
        let yaml = r#"
- submit_contact: { name: Asha, phone: "9999900000" }
- submit_property: { name: Lotus Inn, size: medium, location: Pune }
- toggle: weekdays
- set_time: { bound: to }
- attach: { name: bar.pdf, size: 2048, type: application/pdf }
- detach: 0
- submit_schedule: { total_units: 40, from: "09:00", to: "21:00" }
- back
"#;
        let events: Vec<WizardEvent> = from_yaml_str(yaml).unwrap();
        assert_eq!(events.len(), 8);
        assert_eq!(events[0], submit_contact("Asha", "9999900000"));
        assert_eq!(events[2], WizardEvent::Toggle(ToggleKey::Weekdays));
        assert_eq!(
            events[3],
            WizardEvent::SetTime {
                bound: TimeBound::To,
                value: None
            }
        );
        assert_eq!(events[5], WizardEvent::Detach(0));
        assert_eq!(events[6], submit_schedule(40));
        assert_eq!(events[7], WizardEvent::Back);
    }

    #[test]
    fn test_events_deserialize_from_json() {
        let json = r#"[{"toggle": "sun"}, "back", {"submit_schedule": {"total_units": 2}}]"#;
        let events: Vec<WizardEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events[0], WizardEvent::Toggle(ToggleKey::Day(Weekday::Sun)));
        assert_eq!(events[1], WizardEvent::Back);
        assert_eq!(
            events[2],
            WizardEvent::SubmitSchedule {
                total_units: Some(2),
                from: None,
                to: None,
                description: None
            }
        );
    }
}

use crate::calc::validation::parse_unit_count;
use crate::data::attachment::format_size;
use crate::data::schedule::{format_time, format_time_12h, parse_time};
use crate::data::{AppSettings, Attachment, SizeTier, TimeBound, ToggleKey};
use crate::wizard::{Session, Step, View, WizardEvent};
use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::Stdout;
use std::path::Path;
use std::time::Duration as StdDuration;
use tracing::warn;

// Toggle button colors
const ACTIVE_BG: Color = Color::Blue;
const IDLE_BG: Color = Color::Rgb(60, 64, 72);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    ContactName,
    ContactPhone,
    PropertyName,
    PropertySize,
    PropertyLocation,
    Units,
    Days,
    OpenFrom,
    OpenTo,
    Attachment,
    Description,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::ContactName => "Nice to meet you, I'm",
            Field::ContactPhone => "You can reach out at",
            Field::PropertyName => "Hotel Name",
            Field::PropertySize => "Hotel Size",
            Field::PropertyLocation => "Hotel Location",
            Field::Units => "Total Number of Rooms",
            Field::Days => "Operating Days",
            Field::OpenFrom => "From",
            Field::OpenTo => "To",
            Field::Attachment => "Upload Menus (path)",
            Field::Description => "Description",
        }
    }
}

fn fields_for(step: Step) -> &'static [Field] {
    match step {
        Step::Contact => &[Field::ContactName, Field::ContactPhone],
        Step::Property => &[Field::PropertyName, Field::PropertySize, Field::PropertyLocation],
        Step::Schedule => &[
            Field::Units,
            Field::Days,
            Field::OpenFrom,
            Field::OpenTo,
            Field::Attachment,
            Field::Description,
        ],
        Step::Complete => &[],
    }
}

/// Text typed into the current screen, seeded from the session's form each
/// time a step is entered.
#[derive(Default)]
struct Inputs {
    contact_name: String,
    contact_phone: String,
    property_name: String,
    property_size: Option<SizeTier>,
    property_location: String,
    units: String,
    open_from: String,
    open_to: String,
    attachment_path: String,
    description: String,
}

impl Inputs {
    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::ContactName => Some(&mut self.contact_name),
            Field::ContactPhone => Some(&mut self.contact_phone),
            Field::PropertyName => Some(&mut self.property_name),
            Field::PropertyLocation => Some(&mut self.property_location),
            Field::Units => Some(&mut self.units),
            Field::OpenFrom => Some(&mut self.open_from),
            Field::OpenTo => Some(&mut self.open_to),
            Field::Attachment => Some(&mut self.attachment_path),
            Field::Description => Some(&mut self.description),
            Field::PropertySize | Field::Days => None,
        }
    }

    fn text(&self, field: Field) -> &str {
        match field {
            Field::ContactName => &self.contact_name,
            Field::ContactPhone => &self.contact_phone,
            Field::PropertyName => &self.property_name,
            Field::PropertyLocation => &self.property_location,
            Field::Units => &self.units,
            Field::OpenFrom => &self.open_from,
            Field::OpenTo => &self.open_to,
            Field::Attachment => &self.attachment_path,
            Field::Description => &self.description,
            Field::PropertySize | Field::Days => "",
        }
    }
}

/// Only characters that can make up the field's value are accepted.
fn accepts_char(field: Field, c: char) -> bool {
    match field {
        Field::Units => c.is_ascii_digit(),
        Field::ContactPhone => c.is_ascii_digit() || c == ' ' || c == '-',
        Field::OpenFrom | Field::OpenTo => c.is_ascii_digit() || c == ':',
        _ => true,
    }
}

fn cycle_size(current: Option<SizeTier>, forward: bool) -> Option<SizeTier> {
    let idx = current.and_then(|s| SizeTier::ALL.iter().position(|t| *t == s));
    let len = SizeTier::ALL.len();
    let next = match (idx, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    Some(SizeTier::ALL[next])
}

pub struct App {
    session: Session,
    settings: AppSettings,
    inputs: Inputs,
    /// Index into the current step's fields.
    focus: usize,
    /// Selected button on the day row, indexes `ToggleKey::ALL`.
    day_cursor: usize,
    /// Message from the last action (text, color). Cleared on next keypress.
    status: Option<(String, Color)>,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let session = Session::new(&settings);
        let mut app = App {
            session,
            settings,
            inputs: Inputs::default(),
            focus: 0,
            day_cursor: 0,
            status: None,
        };
        app.reload_inputs();
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn focused_field(&self) -> Option<Field> {
        fields_for(self.session.step()).get(self.focus).copied()
    }

    /// Copies the session's form for the current step into the input buffers.
    fn reload_inputs(&mut self) {
        self.focus = 0;
        self.day_cursor = 0;
        match self.session.view() {
            View::Contact(_) => {
                let c = self.session.contact_form();
                self.inputs.contact_name = c.name.clone();
                self.inputs.contact_phone = c.phone.clone();
            }
            View::Property(_) => {
                let p = self.session.property_form();
                self.inputs.property_name = p.name.clone();
                self.inputs.property_size = p.size;
                self.inputs.property_location = p.location.clone();
            }
            View::Schedule(_) => {
                let s = self.session.schedule_form();
                self.inputs.units = match s.total_units {
                    0 => String::new(),
                    n => n.to_string(),
                };
                let bound_text = |b| s.schedule.bound(b).map(format_time).unwrap_or_default();
                self.inputs.open_from = bound_text(TimeBound::From);
                self.inputs.open_to = bound_text(TimeBound::To);
                self.inputs.attachment_path.clear();
                self.inputs.description = s.description.clone();
            }
            View::Complete(_) => {}
        }
    }

    /// Sends `event` to the session, reporting a rejection in the status line.
    fn dispatch(&mut self, event: WizardEvent) -> bool {
        let before = self.session.step();
        match self.session.dispatch(event) {
            Ok(step) => {
                if step != before {
                    self.reload_inputs();
                }
                true
            }
            Err(e) => {
                let color = if e.is_validation() { Color::Red } else { Color::Yellow };
                self.status = Some((e.to_string(), color));
                false
            }
        }
    }

    fn submit(&mut self) {
        let event = match self.session.step() {
            Step::Contact => WizardEvent::SubmitContact {
                name: Some(self.inputs.contact_name.clone()),
                phone: Some(self.inputs.contact_phone.clone()),
            },
            Step::Property => WizardEvent::SubmitProperty {
                name: Some(self.inputs.property_name.clone()),
                size: self.inputs.property_size,
                location: Some(self.inputs.property_location.clone()),
            },
            Step::Schedule => WizardEvent::SubmitSchedule {
                total_units: Some(parse_unit_count(&self.inputs.units)),
                from: None,
                to: None,
                description: Some(self.inputs.description.clone()),
            },
            Step::Complete => return,
        };
        self.dispatch(event);
    }

    fn attach_from_path(&mut self) {
        let raw = self.inputs.attachment_path.trim().to_string();
        if raw.is_empty() {
            return;
        }
        match Attachment::from_path(Path::new(&raw)) {
            Ok(attachment) => {
                let name = attachment.name.clone();
                if self.dispatch(WizardEvent::Attach(attachment)) {
                    self.inputs.attachment_path.clear();
                    self.status = Some((format!("Attached {name}"), Color::Green));
                }
            }
            Err(e) => {
                warn!(path = %raw, error = %e, "could not read attachment");
                self.status = Some((format!("{e:#}"), Color::Red));
            }
        }
    }

    /// A time input changed: push the parsed value (or "unset") to the form.
    fn sync_time(&mut self, field: Field) {
        let (bound, text) = match field {
            Field::OpenFrom => (TimeBound::From, &self.inputs.open_from),
            Field::OpenTo => (TimeBound::To, &self.inputs.open_to),
            _ => return,
        };
        let value = parse_time(text).ok();
        self.dispatch(WizardEvent::SetTime { bound, value });
    }

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        // Clear the status message on every keypress
        self.status = None;

        let step = self.session.step();
        if step.is_terminal() {
            return matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q'));
        }

        let field_count = fields_for(step).len();
        let field = match self.focused_field() {
            Some(f) => f,
            None => return false,
        };

        match code {
            KeyCode::Esc => {
                if !step.can_retreat() {
                    return true;
                }
                self.dispatch(WizardEvent::Back);
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % field_count;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + field_count - 1) % field_count;
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = code == KeyCode::Right;
                match field {
                    Field::PropertySize => {
                        self.inputs.property_size = cycle_size(self.inputs.property_size, forward);
                    }
                    Field::Days => {
                        let len = ToggleKey::ALL.len();
                        self.day_cursor = if forward {
                            (self.day_cursor + 1) % len
                        } else {
                            (self.day_cursor + len - 1) % len
                        };
                    }
                    _ => {}
                }
            }
            KeyCode::Char(' ') if field == Field::Days => {
                self.dispatch(WizardEvent::Toggle(ToggleKey::ALL[self.day_cursor]));
            }
            KeyCode::Enter => {
                if field == Field::Attachment {
                    self.attach_from_path();
                } else {
                    self.submit();
                }
            }
            KeyCode::Backspace => {
                if field == Field::Attachment && self.inputs.attachment_path.is_empty() {
                    if let Some(last) = self.session.attachments().len().checked_sub(1) {
                        self.dispatch(WizardEvent::Detach(last));
                    }
                } else if let Some(buf) = self.inputs.text_mut(field) {
                    buf.pop();
                    self.sync_time(field);
                }
            }
            KeyCode::Char(c) => {
                if accepts_char(field, c) {
                    if let Some(buf) = self.inputs.text_mut(field) {
                        buf.push(c);
                        self.sync_time(field);
                    }
                }
            }
            _ => {}
        }
        false
    }

    pub fn render(&mut self, f: &mut Frame) {
        let step = self.session.step();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // title + subtitle
                Constraint::Min(8),    // step body
                Constraint::Length(1), // status
                Constraint::Length(1), // key hints
            ])
            .split(f.area());

        self.render_header(f, chunks[0], step);
        match self.session.view() {
            View::Complete(_) => self.render_complete(f, chunks[1]),
            _ => self.render_form(f, chunks[1], step),
        }

        if let Some((msg, color)) = &self.status {
            let status = Paragraph::new(Span::styled(msg.clone(), Style::default().fg(*color)));
            f.render_widget(status, chunks[2]);
        }

        let hints = Paragraph::new(Line::from(Span::styled(
            hint_text(step),
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(hints, chunks[3]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect, step: Step) {
        let lines = vec![
            Line::from(Span::styled(
                step.title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(step.subtitle(), Style::default().fg(Color::Gray))),
        ];
        let header = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Onboarding  step {} of {} ", step.number(), Step::ALL.len())),
        );
        f.render_widget(header, area);
    }

    fn render_form(&self, f: &mut Frame, area: Rect, step: Step) {
        let mut lines: Vec<Line> = Vec::new();
        for (i, field) in fields_for(step).iter().enumerate() {
            let focused = i == self.focus;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(format!("  {:<24}", field.label()), label_style)];
            spans.extend(self.field_value(*field, focused));
            lines.push(Line::from(spans));

            if *field == Field::Attachment {
                for (n, a) in self.session.attachments().iter().enumerate() {
                    lines.push(Line::from(Span::styled(
                        format!("    {}. {} ({}, {})", n + 1, a.name, format_size(a.size), a.mime),
                        Style::default().fg(Color::Cyan),
                    )));
                }
            }
            lines.push(Line::from(""));
        }

        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(body, area);
    }

    fn field_value(&self, field: Field, focused: bool) -> Vec<Span<'static>> {
        let cursor = if focused { "_" } else { "" };
        match field {
            Field::PropertySize => {
                let text = self
                    .inputs
                    .property_size
                    .map(|s| s.label())
                    .unwrap_or("Select hotel size");
                vec![Span::raw(format!("< {text} >"))]
            }
            Field::Days => self.day_buttons(focused),
            Field::ContactPhone => vec![
                Span::styled(
                    format!("{} ", self.settings.country_code),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{}{cursor}", self.inputs.contact_phone)),
            ],
            Field::OpenFrom | Field::OpenTo => {
                let text = self.inputs.text(field);
                let pretty = parse_time(text).map(format_time_12h).unwrap_or_default();
                vec![
                    Span::raw(format!("{text}{cursor}  ")),
                    Span::styled(pretty, Style::default().fg(Color::DarkGray)),
                ]
            }
            _ => vec![Span::raw(format!("{}{cursor}", self.inputs.text(field)))],
        }
    }

    fn day_buttons(&self, focused: bool) -> Vec<Span<'static>> {
        let schedule = &self.session.schedule_form().schedule;
        let mut spans = Vec::new();
        for (i, key) in ToggleKey::ALL.iter().enumerate() {
            let bg = if key.is_active(schedule) { ACTIVE_BG } else { IDLE_BG };
            let mut style = Style::default().fg(Color::White).bg(bg);
            if focused && i == self.day_cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!(" {} ", key.label()), style));
            spans.push(Span::raw(if i == 2 { "   " } else { " " }));
        }
        spans
    }

    fn render_complete(&self, f: &mut Frame, area: Rect) {
        let dump = match self.session.record().render(self.settings.dump_format) {
            Ok(text) => text,
            Err(e) => format!("{e:#}"),
        };
        let mut text = vec![
            Line::from("Thank you for providing your information."),
            Line::from(""),
        ];
        text.extend(dump.lines().map(|l| Line::from(l.to_string())));
        let body = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
        f.render_widget(body, area);
    }
}

fn hint_text(step: Step) -> &'static str {
    match step {
        Step::Contact => "Tab/↑↓=field  Enter=continue  Esc=quit",
        Step::Property => "Tab/↑↓=field  ←→=size  Enter=continue  Esc=back",
        Step::Schedule => {
            "Tab/↑↓=field  ←→/Space=days  Enter=continue (attach on path field)  Bksp=remove file  Esc=back"
        }
        Step::Complete => "Enter/Esc/q=exit",
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

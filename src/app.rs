//! Application state and event handling.
//!
//! One `App` owns every animator: the tab controller, the counter sets, the
//! live metrics, the traffic light, and the timer registry. Timer tasks
//! never touch the state directly; they send [`AppEvent`]s into the channel
//! the runner drains, so all mutation happens on the main loop.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::animation::{Counter, FadeIn};
use crate::config::DashboardConfig;
use crate::metrics::{self, LiveMetric};
use crate::scheduler::{Scheduler, TimerRegistry};
use crate::tabs::{AnimationTrigger, TabController, TabId};
use crate::traffic::TrafficLight;
use crate::ui::widgets::{colors, StatCard, StatGridWidget, TabBarWidget, TrafficLightWidget};
use crate::ui::LayoutMode;

/// Header stats animate over 2 s at startup.
const HEADER_STAT_DURATION: Duration = Duration::from_millis(2000);
/// Improvement percentages animate over 1.5 s.
const IMPROVEMENT_DURATION: Duration = Duration::from_millis(1500);
/// Training statistics animate over 2 s.
const TRAINING_DURATION: Duration = Duration::from_millis(2000);
/// Delay between tab activation and its animation trigger, letting the
/// panel settle first.
const TAB_TRIGGER_DELAY: Duration = Duration::from_millis(100);

/// Events delivered to the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input (keys, resize)
    Input(TermEvent),
    /// The traffic light's dwell elapsed
    TrafficAdvance,
    /// A live metric's jitter timer fired
    MetricTick(usize),
    /// The post-activation animation trigger for a tab
    TabTrigger(TabId),
}

/// The dashboard application.
pub struct App {
    title: String,
    tabs: TabController,
    header_stats: Vec<Counter>,
    improvements: Vec<Counter>,
    training: Vec<Counter>,
    metrics: Vec<LiveMetric>,
    light: TrafficLight,
    fades: [FadeIn; TabId::ALL.len()],
    layout: LayoutMode,
    rng: StdRng,
    scheduler: Scheduler,
    registry: TimerRegistry,
    events: mpsc::UnboundedSender<AppEvent>,
    metrics_live: bool,
    use_color: bool,
    running: bool,
}

impl App {
    /// Build the app from configuration. Counter and metric entries without
    /// a usable numeric target are skipped here.
    pub fn new(config: &DashboardConfig, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            title: config.title.clone(),
            tabs: TabController::new(),
            header_stats: config
                .header_stats
                .iter()
                .filter_map(|c| c.build(HEADER_STAT_DURATION))
                .collect(),
            improvements: config
                .improvements
                .iter()
                .filter_map(|c| c.build(IMPROVEMENT_DURATION))
                .collect(),
            training: config
                .training
                .iter()
                .filter_map(|c| c.build(TRAINING_DURATION))
                .collect(),
            metrics: config.live_metrics.iter().filter_map(|m| m.build()).collect(),
            light: TrafficLight::new(config.demo_groups),
            fades: Default::default(),
            layout: LayoutMode::default(),
            rng: StdRng::from_os_rng(),
            scheduler: Scheduler::new(),
            registry: TimerRegistry::new(),
            events,
            metrics_live: false,
            use_color: true,
            running: true,
        }
    }

    /// Enable or disable colored rendering (`--no-color`, `NO_COLOR`).
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.use_color = enabled;
        self
    }

    /// Start the startup animations and activate the initial tab.
    pub fn startup(&mut self, initial_tab: TabId) {
        for counter in &mut self.header_stats {
            counter.start();
        }
        self.start_traffic_cycle();
        self.activate(initial_tab);
        info!(tab = %initial_tab, "dashboard initialized");
    }

    /// Whether the main loop should keep running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current layout mode.
    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Tab state.
    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    /// Training counters (exposed for tests).
    pub fn training_counters(&self) -> &[Counter] {
        &self.training
    }

    /// Improvement counters (exposed for tests).
    pub fn improvement_counters(&self) -> &[Counter] {
        &self.improvements
    }

    /// Number of live timers currently registered.
    pub fn pending_timers(&self) -> usize {
        self.registry.pending()
    }

    /// Activate a tab: exclusive highlight, panel fade restart, and the
    /// tab's animation trigger after a short settle delay.
    pub fn activate(&mut self, tab: TabId) {
        self.tabs.activate(tab);
        self.fades[tab.position()].restart();
        let tx = self.events.clone();
        self.scheduler.after(TAB_TRIGGER_DELAY, move || {
            tx.send(AppEvent::TabTrigger(tab)).ok();
        });
        debug!(tab = %tab, "tab activated");
    }

    /// Activate by identifier; an unknown identifier deactivates every tab.
    pub fn activate_id(&mut self, id: &str) {
        match id.parse::<TabId>() {
            Ok(tab) => self.activate(tab),
            Err(err) => {
                warn!(%err, "deactivating all tabs");
                self.tabs.activate_id(id);
            }
        }
    }

    /// Cancel every live timer. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.registry.teardown();
    }

    /// Apply one event to the state.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(TermEvent::Key(key)) => self.handle_key(key),
            AppEvent::Input(TermEvent::Resize(width, _)) => self.handle_resize(width),
            AppEvent::Input(_) => {}
            AppEvent::TrafficAdvance => {
                let dwell = self.light.advance();
                self.schedule_traffic_advance(dwell);
            }
            AppEvent::TabTrigger(tab) => self.run_trigger(tab.trigger()),
            AppEvent::MetricTick(index) => match self.metrics.get_mut(index) {
                Some(metric) => metric.jitter(&mut self.rng),
                // A stale timer must not take the loop down with it
                None => warn!(index, "metric tick for unknown metric"),
            },
        }
    }

    /// Recompute the layout for a new terminal width.
    pub fn handle_resize(&mut self, width: u16) {
        let layout = LayoutMode::for_width(width);
        if layout != self.layout {
            debug!(width, ?layout, "layout changed");
            self.layout = layout;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Tab | KeyCode::Right => self.activate_adjacent(1),
            KeyCode::BackTab | KeyCode::Left => self.activate_adjacent(-1),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                if let Some(tab) = TabId::ALL.get(index) {
                    self.activate(*tab);
                }
            }
            _ => {}
        }
    }

    fn activate_adjacent(&mut self, step: isize) {
        let count = TabId::ALL.len() as isize;
        let target = match self.tabs.active() {
            Some(tab) => {
                let position = tab.position() as isize;
                TabId::ALL[((position + step).rem_euclid(count)) as usize]
            }
            None => TabId::Overview,
        };
        self.activate(target);
    }

    fn quit(&mut self) {
        info!("shutting down");
        self.running = false;
        self.teardown();
    }

    fn run_trigger(&mut self, trigger: AnimationTrigger) {
        match trigger {
            AnimationTrigger::ImprovementCounters => {
                for counter in &mut self.improvements {
                    counter.start();
                }
            }
            AnimationTrigger::TrainingCounters => {
                for counter in &mut self.training {
                    counter.start();
                }
            }
            AnimationTrigger::LiveMetrics => self.start_metric_timers(),
            AnimationTrigger::None => {}
        }
    }

    fn start_traffic_cycle(&mut self) {
        // set_traffic replaces any previously running cycle
        self.schedule_traffic_advance(self.light.phase().dwell());
    }

    fn schedule_traffic_advance(&mut self, dwell: Duration) {
        let tx = self.events.clone();
        let handle = self.scheduler.after(dwell, move || {
            tx.send(AppEvent::TrafficAdvance).ok();
        });
        self.registry.set_traffic(handle);
    }

    fn start_metric_timers(&mut self) {
        // Re-activating the analysis tab re-runs the trigger; the timers
        // are already humming, so don't stack duplicates
        if self.metrics_live {
            return;
        }
        self.metrics_live = true;
        for index in 0..self.metrics.len() {
            let tx = self.events.clone();
            let handle = self.scheduler.every_jittered(metrics::PERIOD_MS, move || {
                tx.send(AppEvent::MetricTick(index)).ok();
            });
            self.registry.register(handle);
        }
        debug!(count = self.metrics.len(), "live metric timers started");
    }

    fn counter_cards(counters: &[Counter]) -> Vec<StatCard> {
        counters
            .iter()
            .map(|c| StatCard::new(c.label(), c.render()))
            .collect()
    }

    fn metric_cards(metrics: &[LiveMetric]) -> Vec<StatCard> {
        metrics
            .iter()
            .map(|m| StatCard::new(m.label(), m.render()))
            .collect()
    }

    fn panel_fg(&self, tab: TabId) -> Color {
        let (r, g, b) = self.fades[tab.position()].color(colors::FADE_FROM, colors::FADE_TO);
        Color::Rgb(r, g, b)
    }

    fn fg(&self, color: Color) -> Style {
        if self.use_color {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    /// Render a full frame.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let compact = self.layout.is_compact();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(4), // header stats + signal
                Constraint::Length(1), // tab bar
                Constraint::Min(4),    // active panel
                Constraint::Length(1), // key hints
            ])
            .split(area);

        let title = Paragraph::new(Line::from(Span::styled(
            self.title.clone(),
            self.fg(colors::CYAN),
        )));
        frame.render_widget(title, chunks[0]);

        // Header: stat cards with the primary signal on the right
        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(26)])
            .split(chunks[1]);
        frame.render_widget(
            StatGridWidget::new(Self::counter_cards(&self.header_stats))
                .compact(false)
                .with_color(self.use_color),
            header[0],
        );
        frame.render_widget(
            TrafficLightWidget::primary_only(&self.light).with_color(self.use_color),
            header[1],
        );

        frame.render_widget(
            TabBarWidget::new(self.tabs.active()).with_color(self.use_color),
            chunks[2],
        );

        match self.tabs.active() {
            Some(TabId::Overview) => frame.render_widget(
                StatGridWidget::new(Self::counter_cards(&self.improvements))
                    .with_value_fg(self.panel_fg(TabId::Overview))
                    .compact(compact)
                    .with_color(self.use_color),
                chunks[3],
            ),
            Some(TabId::Training) => frame.render_widget(
                StatGridWidget::new(Self::counter_cards(&self.training))
                    .with_value_fg(self.panel_fg(TabId::Training))
                    .compact(compact)
                    .with_color(self.use_color),
                chunks[3],
            ),
            Some(TabId::Analysis) => frame.render_widget(
                StatGridWidget::new(Self::metric_cards(&self.metrics))
                    .with_value_fg(self.panel_fg(TabId::Analysis))
                    .compact(compact)
                    .with_color(self.use_color),
                chunks[3],
            ),
            Some(TabId::Network) => frame.render_widget(
                TrafficLightWidget::new(&self.light).with_color(self.use_color),
                chunks[3],
            ),
            None => frame.render_widget(
                Paragraph::new("no active tab").style(self.fg(colors::GRAY)),
                chunks[3],
            ),
        }

        let hints = Paragraph::new(Line::from(Span::styled(
            " tab/←→ switch · 1-4 jump · q quit",
            self.fg(colors::MUTED),
        )));
        frame.render_widget(hints, chunks[4]);
    }

    /// Plain-text snapshot for non-TTY output.
    pub fn render_to_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&StatGridWidget::new(Self::counter_cards(&self.header_stats)).render_string());
        out.push('\n');
        out.push_str(&TrafficLightWidget::new(&self.light).render_string());
        out.push('\n');
        out.push_str(&TabBarWidget::new(self.tabs.active()).render_string());
        out.push('\n');
        match self.tabs.active() {
            Some(TabId::Overview) => out
                .push_str(&StatGridWidget::new(Self::counter_cards(&self.improvements)).render_string()),
            Some(TabId::Training) => out
                .push_str(&StatGridWidget::new(Self::counter_cards(&self.training)).render_string()),
            Some(TabId::Analysis) => {
                out.push_str(&StatGridWidget::new(Self::metric_cards(&self.metrics)).render_string())
            }
            Some(TabId::Network) | None => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(&DashboardConfig::default(), tx), rx)
    }

    #[test]
    fn test_new_app_has_no_active_tab() {
        let (app, _rx) = test_app();
        assert_eq!(app.tabs().active(), None);
        assert!(app.is_running());
    }

    #[tokio::test]
    async fn test_activation_is_exclusive() {
        let (mut app, _rx) = test_app();
        app.activate(TabId::Training);
        app.activate(TabId::Analysis);
        let active: Vec<_> = TabId::ALL
            .iter()
            .filter(|t| app.tabs().is_active(**t))
            .collect();
        assert_eq!(active, vec![&TabId::Analysis]);
    }

    #[tokio::test]
    async fn test_tab_trigger_starts_training_counters() {
        let (mut app, mut rx) = test_app();
        assert!(app.training_counters().iter().all(|c| !c.is_started()));

        app.activate(TabId::Training);
        let event = tokio::time::timeout(Duration::from_millis(1000), rx.recv())
            .await
            .expect("trigger within delay")
            .expect("channel open");
        assert!(matches!(event, AppEvent::TabTrigger(TabId::Training)));

        app.apply(event);
        assert!(app.training_counters().iter().all(|c| c.is_started()));
    }

    #[tokio::test]
    async fn test_unknown_tab_id_deactivates_all() {
        let (mut app, _rx) = test_app();
        app.activate(TabId::Overview);
        app.activate_id("junction");
        assert_eq!(app.tabs().active(), None);
    }

    #[tokio::test]
    async fn test_traffic_advance_reschedules() {
        let (mut app, _rx) = test_app();
        app.apply(AppEvent::TrafficAdvance);
        // Advancing installs the next one-shot in the registry
        assert_eq!(app.pending_timers(), 1);
        app.apply(AppEvent::TrafficAdvance);
        assert_eq!(app.pending_timers(), 1);
    }

    #[tokio::test]
    async fn test_metric_timers_start_once() {
        let (mut app, _rx) = test_app();
        app.apply(AppEvent::TabTrigger(TabId::Analysis));
        let pending = app.pending_timers();
        assert!(pending > 0);
        app.apply(AppEvent::TabTrigger(TabId::Analysis));
        assert_eq!(app.pending_timers(), pending);
    }

    #[test]
    fn test_stale_metric_tick_is_ignored() {
        let (mut app, _rx) = test_app();
        app.apply(AppEvent::MetricTick(999));
        assert!(app.is_running());
    }

    #[test]
    fn test_resize_toggles_compact_layout() {
        let (mut app, _rx) = test_app();
        app.apply(AppEvent::Input(TermEvent::Resize(60, 24)));
        assert_eq!(app.layout(), LayoutMode::Compact);
        app.apply(AppEvent::Input(TermEvent::Resize(120, 24)));
        assert_eq!(app.layout(), LayoutMode::Wide);
    }

    #[test]
    fn test_quit_key_stops_and_tears_down() {
        let (mut app, _rx) = test_app();
        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        app.apply(AppEvent::Input(TermEvent::Key(quit)));
        assert!(!app.is_running());
        assert_eq!(app.pending_timers(), 0);
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let (mut app, _rx) = test_app();
        app.apply(AppEvent::TabTrigger(TabId::Analysis));
        app.apply(AppEvent::TrafficAdvance);
        assert!(app.pending_timers() > 0);
        app.teardown();
        assert_eq!(app.pending_timers(), 0);
        app.teardown();
        assert_eq!(app.pending_timers(), 0);
    }

    #[test]
    fn test_render_without_color_is_monochrome() {
        let (app, _rx) = test_app();
        let mut app = app.with_color(false);
        app.tabs.activate(TabId::Overview);

        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let colored = terminal.backend().buffer().content.iter().any(|cell| {
            let style = cell.style();
            style.fg != Some(Color::Reset) || style.bg != Some(Color::Reset)
        });
        assert!(!colored, "disabled colors must not reach the buffer");
    }

    #[test]
    fn test_render_to_string_snapshot() {
        let (mut app, _rx) = test_app();
        app.tabs.activate(TabId::Overview);
        let snapshot = app.render_to_string();
        assert!(snapshot.contains("Project BLINK"));
        assert!(snapshot.contains("signal"));
        assert!(snapshot.contains("[Overview]"));
        assert!(snapshot.contains("Average Wait Time: 0%"));
    }
}

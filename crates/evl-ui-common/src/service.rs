//! Atlas controller.
//!
//! [`AtlasService`] owns the clock, the drill-down selection, the loaded
//! inputs and the render surface. Everything that changes what the map shows
//! arrives as an [`Intent`]; the controller applies the transition, then
//! recomputes the aggregate and repaints.
//!
//! Intents are applied in arrival order. A batch of intents produces at most
//! one repaint, for the `(year, hour, scope)` triple in effect after the last
//! intent of the batch, so a stale hour never overwrites a newer selection.

use std::sync::Arc;
use std::time::Instant;

use evl_core::{Dataset, Layer, StateCode, StateRegistry, Topology, Year};
use evl_io::{load_all, ImportDiagnostics, LoadedInputs};
use evl_ts::{compute_aggregate, AggregateKey, Reading, Scope};
use evl_viz::{format_clock, plan_paint, tooltip_text, ComparisonChart, PaintPlan, Palette, PowerScale};
use tokio::sync::{broadcast, mpsc};

use crate::clock::{ClockDriver, SimClock};
use crate::config::AtlasConfig;
use crate::error::Result;
use crate::events::AtlasEvent;
use crate::intent::Intent;
use crate::logging::{log_error, log_operation_complete, log_user_action};
use crate::selection::Selection;
use crate::surface::RenderSurface;

pub struct AtlasService<S: RenderSurface> {
    config: AtlasConfig,
    palette: Palette,

    dataset: Arc<Dataset>,
    topology: Arc<Topology>,
    diagnostics: ImportDiagnostics,

    clock: SimClock,
    driver: ClockDriver,
    selection: Selection,

    surface: S,
    current: Option<PaintPlan>,

    events: broadcast::Sender<AtlasEvent>,
    intents_tx: mpsc::UnboundedSender<Intent>,
    intents_rx: mpsc::UnboundedReceiver<Intent>,
}

impl<S: RenderSurface> AtlasService<S> {
    /// Load every input, then build the surface and paint hour 0.
    ///
    /// Nothing is handed to the surface unless loading succeeds as a whole.
    pub async fn bootstrap(config: AtlasConfig, surface: S) -> Result<Self> {
        config.validate()?;
        let sources = config.sources();
        let started = Instant::now();
        let loaded = tokio::task::spawn_blocking(move || load_all(&sources)).await?;
        let inputs = match loaded {
            Ok(inputs) => inputs,
            Err(err) => {
                log_error("loading atlas inputs", &err);
                return Err(err.into());
            }
        };
        log_operation_complete("load", started.elapsed().as_millis());
        Self::from_inputs(config, inputs, surface)
    }

    /// Start from inputs that are already loaded.
    pub fn from_inputs(config: AtlasConfig, inputs: LoadedInputs, mut surface: S) -> Result<Self> {
        config.validate()?;
        let LoadedInputs {
            dataset,
            topology,
            diagnostics,
        } = inputs;

        surface.build(&topology);

        let (events, _) = broadcast::channel(256);
        let (intents_tx, intents_rx) = mpsc::unbounded_channel();
        let settings = config.clock_settings();
        let selection = Selection::new(
            Year(config.selector.initial_year),
            config.selector.min_year..=config.selector.max_year,
        );

        let mut service = Self {
            palette: config.palette(),
            dataset: Arc::new(dataset),
            topology: Arc::new(topology),
            diagnostics,
            clock: SimClock::new(settings),
            driver: ClockDriver::new(settings.tick_period, intents_tx.clone()),
            selection,
            surface,
            current: None,
            events,
            intents_tx,
            intents_rx,
            config,
        };
        service.dispatch(Intent::Reset)?;
        tracing::info!(
            records = service.dataset.len(),
            states = service.topology.states.len(),
            counties = service.topology.counties.len(),
            "atlas ready"
        );
        Ok(service)
    }

    /// Apply one intent and repaint if it changed what is shown.
    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        self.dispatch_batch(std::iter::once(intent))
    }

    /// Apply intents in order, then repaint once for the latest triple.
    ///
    /// A rejected intent leaves state untouched and does not stop the rest of
    /// the batch; the first error is returned after the repaint.
    pub fn dispatch_batch<I>(&mut self, intents: I) -> Result<()>
    where
        I: IntoIterator<Item = Intent>,
    {
        let mut repaint = false;
        let mut first_error = None;
        for intent in intents {
            match self.apply(intent) {
                Ok(changed) => repaint |= changed,
                Err(err) => {
                    log_error("dispatch", &err);
                    first_error.get_or_insert(err);
                }
            }
        }
        if repaint {
            self.repaint();
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Process whatever is queued on the intent channel right now.
    pub fn pump(&mut self) -> Result<usize> {
        let mut batch = Vec::new();
        while let Ok(intent) = self.intents_rx.try_recv() {
            batch.push(intent);
        }
        let count = batch.len();
        if count > 0 {
            self.dispatch_batch(batch)?;
        }
        Ok(count)
    }

    /// Drain the intent channel until [`Intent::Shutdown`].
    pub async fn run(&mut self) {
        while let Some(first) = self.intents_rx.recv().await {
            let mut batch = vec![first];
            while let Ok(next) = self.intents_rx.try_recv() {
                batch.push(next);
            }
            let stop = batch.contains(&Intent::Shutdown);
            // Errors are logged per intent.
            let _ = self.dispatch_batch(batch);
            if stop {
                break;
            }
        }
    }

    /// Returns whether a repaint is needed.
    fn apply(&mut self, intent: Intent) -> Result<bool> {
        if intent.is_command() {
            log_user_action(intent.name(), &format!("{intent:?}"));
        }
        match intent {
            Intent::Start => {
                if self.clock.start() {
                    self.driver.spawn(self.clock.generation());
                    self.emit(AtlasEvent::ClockStarted);
                }
                Ok(false)
            }
            Intent::Pause => {
                if self.clock.pause() {
                    self.driver.stop();
                    self.emit(AtlasEvent::ClockPaused);
                }
                Ok(false)
            }
            Intent::Reset => {
                self.driver.stop();
                let hour = self.clock.reset();
                if self.selection.clear() {
                    self.emit(AtlasEvent::SelectionChanged { open_state: None });
                }
                self.surface.set_clock(&format_clock(self.clock.offset_ms()));
                self.emit(AtlasEvent::ClockReset);
                self.emit(AtlasEvent::HourChanged { hour });
                Ok(true)
            }
            Intent::Tick { generation } => {
                let Some(outcome) = self.clock.tick(generation) else {
                    tracing::trace!(generation, "stale tick dropped");
                    return Ok(false);
                };
                self.surface.set_clock(&format_clock(outcome.offset_ms));
                match outcome.hour_changed {
                    Some(hour) => {
                        tracing::debug!(%hour, "hour changed");
                        self.emit(AtlasEvent::HourChanged { hour });
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            Intent::SelectState(reference) => {
                let changed = self.selection.select_state(&reference)?;
                if changed {
                    self.emit(AtlasEvent::SelectionChanged {
                        open_state: self.selection.open_state(),
                    });
                }
                Ok(changed)
            }
            Intent::ClearSelection => {
                let changed = self.selection.clear();
                if changed {
                    self.emit(AtlasEvent::SelectionChanged { open_state: None });
                }
                Ok(changed)
            }
            Intent::SelectYear(year) => {
                if self.selection.select_year(year)? {
                    self.emit(AtlasEvent::YearChanged { year: Year(year) });
                }
                // Always recompute at the current hour.
                Ok(true)
            }
            Intent::Hover { layer, id } => {
                match self.tooltip(layer, &id) {
                    Some(text) => self.surface.show_tooltip(&text),
                    None => self.surface.hide_tooltip(),
                }
                self.selection.hover(layer, id);
                Ok(false)
            }
            Intent::Leave => {
                self.selection.leave();
                self.surface.hide_tooltip();
                Ok(false)
            }
            Intent::Shutdown => {
                if self.clock.pause() {
                    self.emit(AtlasEvent::ClockPaused);
                }
                self.driver.stop();
                Ok(false)
            }
        }
    }

    fn repaint(&mut self) {
        let started = Instant::now();
        let key = self.current_key();
        let view = compute_aggregate(&self.dataset, key);
        let plan = plan_paint(
            &view,
            &self.topology,
            &self.palette,
            self.config.scale.legend_stops,
        );
        let scale = PowerScale::build(view.domain, plan.level(), &self.palette);
        let chart = ComparisonChart::from_view(&view, &scale, self.config.chart.top_n, |id| {
            self.display_name(key.scope, id)
        })
        .with_title(format!("Top {} at {}, {}", key.scope, key.hour, key.year))
        .bar_width(self.config.chart.bar_width);

        self.surface.paint(&plan);
        self.surface.show_chart(&chart);
        self.current = Some(plan);

        tracing::debug!(year = %key.year, hour = %key.hour, scope = %key.scope, "repainted");
        self.emit(AtlasEvent::Repainted {
            year: key.year,
            hour: key.hour,
            scope: key.scope,
        });
        log_operation_complete("repaint", started.elapsed().as_millis());
    }

    /// Hover text for a feature. The state layer stays hoverable under an
    /// open county view, so state tooltips fall back to a state aggregate.
    fn tooltip(&self, layer: Layer, id: &str) -> Option<String> {
        let painted = self
            .current
            .as_ref()
            .and_then(|plan| plan.fill(id))
            .filter(|fill| fill.layer == layer);
        if let Some(fill) = painted {
            return Some(fill.tooltip());
        }
        match layer {
            Layer::State => {
                let feature = self.topology.state(id)?;
                let key = AggregateKey {
                    scope: Scope::State,
                    ..self.current_key()
                };
                let reading = StateRegistry::global()
                    .by_fips(id)
                    .map_or(Reading::NoData, |info| {
                        compute_aggregate(&self.dataset, key).lookup(info.code.as_str())
                    });
                Some(tooltip_text(&feature.name, reading))
            }
            Layer::County => None,
        }
    }

    /// Chart label for an aggregate id.
    fn display_name(&self, scope: Scope, id: &str) -> String {
        let registry = StateRegistry::global();
        let name = match scope {
            Scope::State => StateCode::parse(id)
                .and_then(|code| registry.by_code(code))
                .map(|info| info.name.to_string()),
            Scope::County { state } => registry
                .by_code(state)
                .and_then(|info| self.dataset.membership().entry(info.name))
                .and_then(|entry| {
                    let idx = entry.keys.iter().position(|k| k.as_str() == id)?;
                    entry.counties.get(idx).cloned()
                }),
        };
        name.unwrap_or_else(|| id.to_string())
    }

    fn emit(&self, event: AtlasEvent) {
        let _ = self.events.send(event);
    }

    /// The triple the next repaint would use.
    pub fn current_key(&self) -> AggregateKey {
        AggregateKey {
            year: self.selection.year(),
            hour: self.clock.hour(),
            scope: self.selection.scope(),
        }
    }

    /// Last plan handed to the surface.
    pub fn current_plan(&self) -> Option<&PaintPlan> {
        self.current.as_ref()
    }

    /// Sender for surfaces that queue intents instead of dispatching.
    pub fn intents(&self) -> mpsc::UnboundedSender<Intent> {
        self.intents_tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AtlasEvent> {
        self.events.subscribe()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn diagnostics(&self) -> &ImportDiagnostics {
        &self.diagnostics
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn is_ticking(&self) -> bool {
        self.driver.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evl_core::{CountyFeature, CountyMembership, DemandRecord, HourOfDay, Kilowatts, StateFeature};

    use crate::surface::RecordingSurface;

    fn inputs() -> LoadedInputs {
        let at = |h: u8| HourOfDay::new(h);
        let tx = StateCode::parse("TX");
        let records = vec![
            DemandRecord::new(Year(2023), at(0), "Travis County, TX", tx, Kilowatts(10.0)),
            DemandRecord::new(Year(2023), at(0), "Denver County", None, Kilowatts(4.0)),
            DemandRecord::new(Year(2023), at(1), "Travis County, TX", tx, Kilowatts(20.0)),
            DemandRecord::new(Year(2024), at(0), "Travis County, TX", tx, Kilowatts(99.0)),
        ];
        let membership = CountyMembership::new(vec![
            ("Texas", vec!["Travis County", "Adams County"]),
            ("Colorado", vec!["Denver County"]),
        ]);
        LoadedInputs {
            dataset: Dataset::new(records, membership),
            topology: Topology {
                states: vec![
                    StateFeature { id: "48".into(), name: "Texas".into() },
                    StateFeature { id: "08".into(), name: "Colorado".into() },
                ],
                counties: vec![
                    CountyFeature { id: "48453".into(), name: "Travis".into() },
                    CountyFeature { id: "48001".into(), name: "Adams".into() },
                    CountyFeature { id: "08031".into(), name: "Denver".into() },
                ],
            },
            diagnostics: ImportDiagnostics::new(),
        }
    }

    fn service() -> AtlasService<RecordingSurface> {
        AtlasService::from_inputs(AtlasConfig::default(), inputs(), RecordingSurface::new()).unwrap()
    }

    #[test]
    fn test_construction_builds_then_paints_hour_zero() {
        let svc = service();
        assert_eq!(svc.surface().built, Some((2, 3)));
        assert_eq!(svc.surface().paint_count(), 1);
        assert_eq!(svc.surface().clock.as_deref(), Some("00:00:00"));

        let plan = svc.current_plan().unwrap();
        assert_eq!(plan.key.hour, HourOfDay::MIDNIGHT);
        assert_eq!(plan.fill("48").unwrap().reading, Reading::Value(10.0));
        assert_eq!(plan.fill("08").unwrap().reading, Reading::Value(4.0));
    }

    #[test]
    fn test_chart_uses_display_names() {
        let svc = service();
        let chart = svc.surface().charts.last().unwrap();
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Texas", "Colorado"]);
    }

    #[test]
    fn test_select_year_repaints_current_hour() {
        let mut svc = service();
        svc.dispatch(Intent::SelectYear(2024)).unwrap();
        let plan = svc.current_plan().unwrap();
        assert_eq!(plan.key.year, Year(2024));
        assert_eq!(plan.fill("48").unwrap().reading, Reading::Value(99.0));
        assert_eq!(plan.fill("08").unwrap().reading, Reading::NoData);
    }

    #[test]
    fn test_year_out_of_range_keeps_state() {
        let mut svc = service();
        let paints = svc.surface().paint_count();
        let err = svc.dispatch(Intent::SelectYear(2050)).unwrap_err();
        assert!(matches!(err, crate::Error::YearOutOfRange { year: 2050, .. }));
        assert_eq!(svc.selection().year(), Year(2023));
        assert_eq!(svc.surface().paint_count(), paints);
    }

    #[test]
    fn test_hover_and_leave() {
        let mut svc = service();
        svc.dispatch(Intent::Hover {
            layer: Layer::State,
            id: "48".into(),
        })
        .unwrap();
        assert_eq!(svc.surface().tooltip.as_deref(), Some("Texas: 10 kW"));

        svc.dispatch(Intent::SelectState("Texas".into())).unwrap();
        svc.dispatch(Intent::Hover {
            layer: Layer::County,
            id: "48001".into(),
        })
        .unwrap();
        assert_eq!(svc.surface().tooltip.as_deref(), Some("Adams: no data"));

        // State layer under the open county view.
        svc.dispatch(Intent::Hover {
            layer: Layer::State,
            id: "08".into(),
        })
        .unwrap();
        assert_eq!(svc.surface().tooltip.as_deref(), Some("Colorado: 4 kW"));

        svc.dispatch(Intent::Leave).unwrap();
        assert!(svc.surface().tooltip.is_none());
        assert!(svc.selection().hovered().is_none());
    }

    #[test]
    fn test_batch_paints_once_with_latest_triple() {
        let mut svc = service();
        let paints = svc.surface().paint_count();
        svc.dispatch_batch(vec![
            Intent::SelectYear(2024),
            Intent::SelectState("TX".into()),
            Intent::SelectYear(2023),
        ])
        .unwrap();
        assert_eq!(svc.surface().paint_count(), paints + 1);
        let key = svc.current_plan().unwrap().key;
        assert_eq!(key.year, Year(2023));
        assert_eq!(
            key.scope,
            Scope::County {
                state: StateCode::parse("TX").unwrap()
            }
        );
    }

    #[test]
    fn test_reset_closes_open_state() {
        let mut svc = service();
        svc.dispatch(Intent::SelectState("Texas".into())).unwrap();
        svc.dispatch(Intent::Reset).unwrap();
        assert_eq!(svc.selection().scope(), Scope::State);
        assert_eq!(svc.current_plan().unwrap().level(), Layer::State);
    }

    #[test]
    fn test_events_are_broadcast() {
        let mut svc = service();
        let mut rx = svc.subscribe();
        svc.dispatch(Intent::SelectState("Texas".into())).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            AtlasEvent::SelectionChanged {
                open_state: StateCode::parse("TX")
            }
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            AtlasEvent::Repainted { scope: Scope::County { .. }, .. }
        ));
    }
}

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::core::{
    CanvasSurface, ChartWindow, Sample, Series, SeriesSpec, WindowMode, default_cems_parameters,
    samples_in_time_window,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HoverLocator, HoverState, HoverTooltip};
use crate::render::Renderer;
use crate::transport::{
    ConnectionState, HistoryClient, HistoryQuery, LiveChannel, SampleBatch, StreamingTransport,
    TransportEvent,
};

use super::axis_label_format::{format_tooltip_time, utc_offset};
use super::{
    ChartRenderer, ChartSeries, ControllerConfig, HistoricalRange, RenderOptions, RenderOutcome,
    SeriesSummary,
};

/// Operator-facing notice raised by a failed or empty fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartNotice {
    FetchTimeout,
    FetchFailed,
    NoData,
}

impl ChartNotice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::FetchTimeout => "connection slow, please retry",
            Self::FetchFailed => "failed to load data",
            Self::NoData => "no data",
        }
    }

    fn from_error(err: &ChartError) -> Self {
        match err {
            ChartError::Timeout { .. } => Self::FetchTimeout,
            _ => Self::FetchFailed,
        }
    }
}

/// A canvas owned by the controller: its displayed size and its renderer.
#[derive(Debug)]
pub struct CanvasHandle<R> {
    surface: CanvasSurface,
    renderer: R,
    last_outcome: Option<RenderOutcome>,
}

impl<R: Renderer> CanvasHandle<R> {
    #[must_use]
    pub fn new(surface: CanvasSurface, renderer: R) -> Self {
        Self {
            surface,
            renderer,
            last_outcome: None,
        }
    }

    #[must_use]
    pub fn surface(&self) -> CanvasSurface {
        self.surface
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Outcome of the most recent paint, if any.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&RenderOutcome> {
        self.last_outcome.as_ref()
    }

    fn paint(&mut self, series: &Series, options: &RenderOptions) -> ChartResult<()> {
        let view = [ChartSeries::from(series)];
        let outcome = ChartRenderer::render(&mut self.renderer, self.surface, &view, options)?;
        self.last_outcome = Some(outcome);
        Ok(())
    }
}

/// Snapshot for the dashboard status bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub connection: ConnectionState,
    pub data_source_online: bool,
    pub last_update_ms: Option<i64>,
    pub total_points: usize,
    pub running: bool,
    pub mode: WindowMode,
    pub live_window_ms: i64,
    pub notice: Option<ChartNotice>,
}

/// Orchestrates buffers, canvases, backfills and repaints for one parameter set.
///
/// Single-threaded and event driven: the host forwards transport events and
/// wall-clock time, and calls [`ChartController::render_dirty`] once per frame.
/// Mutations only mark canvases dirty, so bursts of batches coalesce into one
/// repaint showing the newest state.
pub struct ChartController<R: Renderer, H: HistoryClient> {
    config: ControllerConfig,
    history: H,
    series: IndexMap<String, Series>,
    canvases: IndexMap<String, CanvasHandle<R>>,
    expanded: Option<(String, CanvasHandle<R>)>,
    window: ChartWindow,
    historical_range: HistoricalRange,
    running: bool,
    connection: ConnectionState,
    data_source_online: bool,
    last_update_ms: Option<i64>,
    last_poll_ms: Option<i64>,
    notice: Option<ChartNotice>,
    dirty: IndexSet<String>,
    paused_backlog: Vec<SampleBatch>,
    hover: HoverState,
}

impl<R: Renderer, H: HistoryClient> ChartController<R, H> {
    pub fn new(config: ControllerConfig, history: H) -> ChartResult<Self> {
        let config = config.validate()?;
        let window = ChartWindow::live(config.live_window_ms);
        Ok(Self {
            config,
            history,
            series: IndexMap::new(),
            canvases: IndexMap::new(),
            expanded: None,
            window,
            historical_range: HistoricalRange::OneHour,
            running: true,
            connection: ConnectionState::Disconnected,
            data_source_online: false,
            last_update_ms: None,
            last_poll_ms: None,
            notice: None,
            dirty: IndexSet::new(),
            paused_backlog: Vec::new(),
            hover: HoverState::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    // ---- series -------------------------------------------------------

    /// Declares a parameter, or updates the metadata of a known one while
    /// keeping its samples. Disabled specs start with an empty buffer.
    pub fn declare_series(&mut self, spec: SeriesSpec) {
        let name = spec.name.clone();
        match self.series.get_mut(&name) {
            Some(series) => {
                if !spec.enabled {
                    series.buffer_mut().clear();
                }
                series.spec = spec;
            }
            None => {
                debug!(series = %name, "declared series");
                self.series
                    .insert(name.clone(), Series::new(spec, self.config.buffer));
            }
        }
        self.dirty.insert(name);
    }

    /// Declares the stock nine-parameter set.
    pub fn declare_default_parameters(&mut self) {
        for spec in default_cems_parameters() {
            self.declare_series(spec);
        }
    }

    /// Disabling discards the buffer; re-enabling starts empty.
    pub fn set_series_enabled(&mut self, name: &str, enabled: bool) -> ChartResult<()> {
        let series = self
            .series
            .get_mut(name)
            .ok_or_else(|| ChartError::UnknownSeries(name.to_owned()))?;
        if series.spec.enabled == enabled {
            return Ok(());
        }
        series.spec.enabled = enabled;
        if !enabled {
            series.buffer_mut().clear();
        }
        debug!(series = %name, enabled, "series toggled");
        self.dirty.insert(name.to_owned());
        Ok(())
    }

    /// Drops the series together with its canvas.
    pub fn remove_series(&mut self, name: &str) -> Option<Series> {
        let removed = self.series.shift_remove(name)?;
        self.canvases.shift_remove(name);
        self.dirty.shift_remove(name);
        if self
            .expanded
            .as_ref()
            .is_some_and(|(expanded, _)| expanded == name)
        {
            self.expanded = None;
        }
        Some(removed)
    }

    #[must_use]
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    pub fn series_iter(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    #[must_use]
    pub fn summary(&self, name: &str) -> Option<SeriesSummary> {
        SeriesSummary::from_samples(self.series.get(name)?.samples())
    }

    // ---- canvases -----------------------------------------------------

    pub fn attach_canvas(
        &mut self,
        name: &str,
        surface: CanvasSurface,
        renderer: R,
    ) -> ChartResult<()> {
        if !self.series.contains_key(name) {
            return Err(ChartError::UnknownSeries(name.to_owned()));
        }
        self.canvases
            .insert(name.to_owned(), CanvasHandle::new(surface, renderer));
        self.dirty.insert(name.to_owned());
        Ok(())
    }

    pub fn detach_canvas(&mut self, name: &str) -> Option<R> {
        self.dirty.shift_remove(name);
        self.canvases
            .shift_remove(name)
            .map(|handle| handle.renderer)
    }

    #[must_use]
    pub fn canvas(&self, name: &str) -> Option<&CanvasHandle<R>> {
        self.canvases.get(name)
    }

    /// New displayed size for one canvas; repaints without refetching.
    pub fn resize_canvas(&mut self, name: &str, surface: CanvasSurface) -> ChartResult<()> {
        let canvas = self
            .canvases
            .get_mut(name)
            .ok_or_else(|| ChartError::UnknownSeries(name.to_owned()))?;
        canvas.surface = surface;
        self.dirty.insert(name.to_owned());
        Ok(())
    }

    /// Window resize: every canvas repaints on the next frame.
    pub fn handle_resize(&mut self) {
        self.mark_all_dirty();
    }

    /// Shows one series enlarged on its own canvas.
    pub fn open_expanded(
        &mut self,
        name: &str,
        surface: CanvasSurface,
        renderer: R,
    ) -> ChartResult<()> {
        if !self.series.contains_key(name) {
            return Err(ChartError::UnknownSeries(name.to_owned()));
        }
        self.expanded = Some((name.to_owned(), CanvasHandle::new(surface, renderer)));
        self.dirty.insert(name.to_owned());
        Ok(())
    }

    pub fn close_expanded(&mut self) -> Option<R> {
        self.expanded.take().map(|(_, handle)| handle.renderer)
    }

    #[must_use]
    pub fn expanded_canvas(&self) -> Option<(&str, &CanvasHandle<R>)> {
        self.expanded
            .as_ref()
            .map(|(name, handle)| (name.as_str(), handle))
    }

    // ---- window and run state -----------------------------------------

    #[must_use]
    pub fn window(&self) -> ChartWindow {
        self.window
    }

    #[must_use]
    pub fn historical_range(&self) -> HistoricalRange {
        self.historical_range
    }

    /// Switches to Live mode, backfilling the live window first so the chart
    /// is populated before push updates resume. No-op when already live.
    pub fn enter_live(&mut self, now_ms: i64) {
        if self.window.mode == WindowMode::Live {
            return;
        }
        self.start_live(now_ms);
    }

    /// Loads the live window from history and (re)starts Live mode.
    ///
    /// Unlike [`ChartController::enter_live`] this always backfills; hosts call
    /// it once at startup, since a new controller is already in Live mode.
    pub fn start_live(&mut self, now_ms: i64) {
        info!(window_ms = self.config.live_window_ms, "starting live mode");
        self.window = ChartWindow::live(self.config.live_window_ms);
        self.last_poll_ms = Some(now_ms);
        self.backfill_live_window(now_ms);
        self.mark_all_dirty();
    }

    /// Selects one of the live window presets. In Live mode the new window is
    /// backfilled from history.
    pub fn set_live_window(&mut self, window_ms: i64, now_ms: i64) -> ChartResult<()> {
        self.config.check_live_window(window_ms)?;
        self.config.live_window_ms = window_ms;
        if self.window.mode == WindowMode::Live {
            self.window = ChartWindow::live(window_ms);
            self.backfill_live_window(now_ms);
        }
        self.mark_all_dirty();
        Ok(())
    }

    /// Switches to Historical mode and loads `range` into the buffers.
    pub fn enter_historical(&mut self, range: HistoricalRange, now_ms: i64) -> ChartResult<()> {
        let range = range.validate()?;
        let (start_ms, end_ms) = range.bounds(now_ms);
        info!(?range, start_ms, end_ms, "entering historical mode");
        self.window = ChartWindow::historical(end_ms - start_ms);
        self.historical_range = range;
        self.last_poll_ms = Some(now_ms);
        self.fetch_historical(now_ms);
        self.mark_all_dirty();
        Ok(())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pausing freezes repaints and queues incoming batches; resuming applies
    /// the queue and repaints everything.
    pub fn set_running(&mut self, running: bool, now_ms: i64) {
        if self.running == running {
            return;
        }
        self.running = running;
        if running {
            let backlog = std::mem::take(&mut self.paused_backlog);
            info!(queued = backlog.len(), "resuming chart updates");
            if self.window.mode == WindowMode::Live && !backlog.is_empty() {
                self.apply_batches(backlog, now_ms);
            }
            self.mark_all_dirty();
        } else {
            info!("pausing chart updates");
        }
    }

    // ---- ingestion ----------------------------------------------------

    pub fn handle_transport_event(&mut self, event: TransportEvent, now_ms: i64) {
        match event {
            TransportEvent::StateChanged(state) => {
                if self.connection != state {
                    debug!(from = ?self.connection, to = ?state, "observed connection state");
                    self.connection = state;
                }
            }
            TransportEvent::Batches(batches) => {
                self.ingest_batches(batches, now_ms);
            }
        }
    }

    /// Polls `transport` and forwards everything it reports.
    pub fn pump<C: LiveChannel>(
        &mut self,
        transport: &mut StreamingTransport<C>,
        now_ms: i64,
    ) -> usize {
        let events = transport.poll(now_ms);
        let count = events.len();
        for event in events {
            self.handle_transport_event(event, now_ms);
        }
        count
    }

    /// Routes live records into their buffers and prunes what changed.
    ///
    /// Returns the number of samples that changed a buffer. Ignored in
    /// Historical mode; queued while paused.
    pub fn ingest_batches(&mut self, batches: Vec<SampleBatch>, now_ms: i64) -> usize {
        if self.window.mode != WindowMode::Live {
            trace!(records = batches.len(), "ignoring live records in historical mode");
            return 0;
        }
        if !self.running {
            self.paused_backlog.extend(batches);
            let cap = self.config.buffer.hard_cap;
            if self.paused_backlog.len() > cap {
                let excess = self.paused_backlog.len() - cap;
                self.paused_backlog.drain(..excess);
            }
            trace!(queued = self.paused_backlog.len(), "queued live records while paused");
            return 0;
        }
        self.apply_batches(batches, now_ms)
    }

    fn apply_batches(&mut self, mut batches: Vec<SampleBatch>, now_ms: i64) -> usize {
        if batches.is_empty() {
            return 0;
        }
        // Range queries answer newest first; buffers expect oldest first.
        batches.sort_by_key(|batch| batch.timestamp_ms);
        let mut accepted = 0_usize;
        let mut touched: IndexSet<String> = IndexSet::new();
        for batch in &batches {
            if let Some(online) = batch.source_online() {
                self.data_source_online = online;
            }
            for series in self.series.values_mut().filter(|series| series.spec.enabled) {
                let Some(value) = batch.value_for(&series.spec.name, series.spec.source) else {
                    continue;
                };
                let outcome = series
                    .buffer_mut()
                    .append(Sample::new(batch.timestamp_ms, value));
                if outcome.changed() {
                    accepted += 1;
                    touched.insert(series.spec.name.clone());
                }
            }
        }

        let window_ms = self.window.window_ms;
        let capacity = self.config.live_prune_capacity(window_ms);
        for name in &touched {
            if let Some(series) = self.series.get_mut(name) {
                series.buffer_mut().prune(now_ms, window_ms, capacity);
            }
        }
        self.dirty.extend(touched);
        self.last_update_ms = Some(now_ms);
        trace!(records = batches.len(), accepted, "ingested live records");
        accepted
    }

    // ---- fetching -----------------------------------------------------

    /// Polling fallback, called periodically by the host.
    ///
    /// Historical mode refreshes the selected range on its interval. Live mode
    /// pulls records newer than the buffers only while the push channel is
    /// not connected. Returns whether a query was issued.
    pub fn tick(&mut self, now_ms: i64) -> bool {
        if !self.running {
            return false;
        }
        let interval = match self.window.mode {
            WindowMode::Live => self.config.live_poll_interval_ms,
            WindowMode::Historical => self.config.historical_poll_interval_ms,
        };
        if self
            .last_poll_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < interval)
        {
            return false;
        }
        if self.window.mode == WindowMode::Live && self.connection == ConnectionState::Connected {
            return false;
        }
        self.refresh(now_ms);
        true
    }

    /// Issues the mode's query immediately, ignoring the poll interval.
    pub fn refresh(&mut self, now_ms: i64) {
        self.last_poll_ms = Some(now_ms);
        match self.window.mode {
            WindowMode::Live => self.pull_latest(now_ms),
            WindowMode::Historical => {
                self.fetch_historical(now_ms);
                self.mark_all_dirty();
            }
        }
    }

    fn query(&self, start_ms: i64, end_ms: i64, limit: usize) -> HistoryQuery {
        HistoryQuery::new(start_ms, end_ms, limit).with_stack_id(self.config.stack_id.clone())
    }

    fn backfill_live_window(&mut self, now_ms: i64) {
        let window_ms = self.window.window_ms;
        let query = self.query(
            now_ms.saturating_sub(window_ms),
            now_ms,
            self.config.backfill_limit,
        );
        let batches = match self.history.fetch_range(&query) {
            Ok(batches) => batches,
            Err(err) => {
                warn!(error = %err, window_ms, "live backfill failed");
                self.notice = Some(ChartNotice::from_error(&err));
                return;
            }
        };
        if batches.is_empty() {
            debug!(window_ms, "live backfill returned no records");
            self.notice = Some(ChartNotice::NoData);
            return;
        }

        let capacity = self.config.live_prune_capacity(window_ms);
        for series in self.series.values_mut().filter(|series| series.spec.enabled) {
            let samples = samples_for(&batches, series);
            let buffer = series.buffer_mut();
            buffer.replace_all(samples);
            buffer.prune(now_ms, window_ms, capacity);
        }
        self.notice = None;
        self.last_update_ms = Some(now_ms);
        info!(records = batches.len(), window_ms, "live window backfilled");
    }

    fn pull_latest(&mut self, now_ms: i64) {
        let newest = self
            .series
            .values()
            .filter_map(|series| series.buffer().last())
            .map(|sample| sample.t)
            .max();
        let start_ms = newest
            .map(|t| t.saturating_add(1))
            .unwrap_or_else(|| now_ms.saturating_sub(self.window.window_ms));
        let query = self.query(start_ms, now_ms, self.config.backfill_limit);
        match self.history.fetch_range(&query) {
            Ok(batches) => {
                self.notice = None;
                self.apply_batches(batches, now_ms);
            }
            Err(err) => {
                warn!(error = %err, "latest-data poll failed");
                self.notice = Some(ChartNotice::from_error(&err));
            }
        }
    }

    fn fetch_historical(&mut self, now_ms: i64) {
        let (start_ms, end_ms) = self.historical_range.bounds(now_ms);
        let query = self.query(start_ms, end_ms, self.config.historical_limit);
        let batches = match self.history.fetch_range(&query) {
            Ok(batches) => batches,
            Err(err) => {
                warn!(error = %err, start_ms, end_ms, "historical fetch failed");
                self.notice = Some(ChartNotice::from_error(&err));
                self.data_source_online = false;
                return;
            }
        };
        if batches.is_empty() {
            debug!(start_ms, end_ms, "historical range is empty");
            self.notice = Some(ChartNotice::NoData);
            self.data_source_online = false;
            return;
        }

        for series in self.series.values_mut().filter(|series| series.spec.enabled) {
            let samples = samples_for(&batches, series);
            let len = series.buffer_mut().merge(samples);
            trace!(series = %series.spec.name, len, "merged historical samples");
        }
        self.notice = None;
        self.data_source_online = true;
        self.last_update_ms = Some(now_ms);
        info!(records = batches.len(), start_ms, end_ms, "historical range loaded");
    }

    // ---- rendering ----------------------------------------------------

    /// Marks one series' canvases for repaint.
    pub fn mark_dirty(&mut self, name: &str) {
        if self.series.contains_key(name) {
            self.dirty.insert(name.to_owned());
        }
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.extend(self.series.keys().cloned());
    }

    #[must_use]
    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Repaints every dirty canvas once. Skipped while paused.
    ///
    /// A backend failure on one canvas does not stop the others; the first
    /// failure is returned after the pass.
    pub fn render_dirty(&mut self) -> ChartResult<usize> {
        if !self.running || self.dirty.is_empty() {
            return Ok(0);
        }
        let dirty: Vec<String> = self.dirty.drain(..).collect();
        let mut rendered = 0_usize;
        let mut first_error = None;
        for name in dirty {
            match self.render_series(&name) {
                Ok(count) => rendered += count,
                Err(err) => {
                    warn!(series = %name, error = %err, "chart render failed");
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(rendered),
        }
    }

    /// Repaints every canvas, e.g. after the host recreated its surfaces.
    pub fn render_all(&mut self) -> ChartResult<usize> {
        self.mark_all_dirty();
        self.render_dirty()
    }

    fn render_series(&mut self, name: &str) -> ChartResult<usize> {
        let Some(series) = self.series.get(name) else {
            return Ok(0);
        };
        if !series.spec.enabled {
            return Ok(0);
        }
        let (window_start, window_end) = self.visible_bounds(series);
        let hover = self
            .hover
            .tooltip()
            .filter(|tooltip| tooltip.series == name)
            .map(|tooltip| tooltip.sample);
        let mut rendered = 0;

        if let Some(canvas) = self.canvases.get_mut(name) {
            let options = RenderOptions::card()
                .with_hover(hover)
                .with_title(format!("{} Real-time Monitoring", series.spec.display_label))
                .with_unit(series.spec.unit.as_str())
                .with_max_points(self.config.render_capacity(self.config.live_window_ms))
                .with_window(window_start, window_end)
                .with_utc_offset_minutes(self.config.utc_offset_minutes);
            canvas.paint(series, &options)?;
            rendered += 1;
        }

        if let Some((expanded, canvas)) = self.expanded.as_mut() {
            if expanded == name {
                let options = RenderOptions::expanded()
                    .with_title(format!("{} Real-time Monitoring", series.spec.display_label))
                    .with_unit(series.spec.unit.as_str())
                    .with_max_points(self.config.expanded_max_points)
                    .with_window(window_start, window_end)
                    .with_utc_offset_minutes(self.config.utc_offset_minutes);
                canvas.paint(series, &options)?;
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    fn visible_bounds(&self, series: &Series) -> (Option<i64>, Option<i64>) {
        self.window
            .visible_bounds(series.buffer().last().map(|sample| sample.t))
    }

    // ---- hover --------------------------------------------------------

    /// Resolves the tooltip for a pointer over `name`'s card canvas, using
    /// the projection of its last paint. A changed tooltip repaints the
    /// affected canvases so the crosshair follows the pointer.
    pub fn hover(&mut self, name: &str, x: f64, y: f64) -> Option<HoverTooltip> {
        let previous = self.hover.tooltip().map(|tooltip| tooltip.series.clone());
        self.hover.on_pointer_move(name, x, y);
        let tooltip = self.locate_tooltip(name, x, y);
        if self.hover.tooltip() != tooltip.as_ref() {
            if let Some(previous) = previous {
                self.mark_dirty(&previous);
            }
            self.mark_dirty(name);
        }
        self.hover.set_tooltip(tooltip.clone());
        tooltip
    }

    pub fn clear_hover(&mut self) {
        if let Some(series) = self.hover.tooltip().map(|tooltip| tooltip.series.clone()) {
            self.mark_dirty(&series);
        }
        self.hover.on_pointer_leave();
    }

    #[must_use]
    pub fn hover_state(&self) -> &HoverState {
        &self.hover
    }

    fn locate_tooltip(&self, name: &str, x: f64, y: f64) -> Option<HoverTooltip> {
        let series = self.series.get(name)?;
        let projection = *self.canvases.get(name)?.last_outcome()?.projection()?;
        let (start, end) = self.visible_bounds(series);
        let visible = samples_in_time_window(series.samples(), start, end);
        let sample = HoverLocator::locate(x, y, &visible, &projection)?;
        Some(HoverTooltip {
            series: series.spec.name.clone(),
            label: series.spec.display_label.clone(),
            unit: series.spec.unit.clone(),
            time_label: format_tooltip_time(sample.t, utc_offset(self.config.utc_offset_minutes)),
            value: sample.y,
            sample,
            x: projection.x_for_time(sample.t as f64),
            y: projection.y_for_value(sample.y),
        })
    }

    // ---- status -------------------------------------------------------

    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    #[must_use]
    pub fn data_source_online(&self) -> bool {
        self.data_source_online
    }

    #[must_use]
    pub fn last_update_ms(&self) -> Option<i64> {
        self.last_update_ms
    }

    #[must_use]
    pub fn notice(&self) -> Option<ChartNotice> {
        self.notice
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    #[must_use]
    pub fn total_points(&self) -> usize {
        self.series.values().map(|series| series.buffer().len()).sum()
    }

    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            connection: self.connection,
            data_source_online: self.data_source_online,
            last_update_ms: self.last_update_ms,
            total_points: self.total_points(),
            running: self.running,
            mode: self.window.mode,
            live_window_ms: self.config.live_window_ms,
            notice: self.notice,
        }
    }
}

fn samples_for(batches: &[SampleBatch], series: &Series) -> Vec<Sample> {
    batches
        .iter()
        .filter_map(|batch| {
            batch
                .value_for(&series.spec.name, series.spec.source)
                .map(|value| Sample::new(batch.timestamp_ms, value))
        })
        .collect()
}

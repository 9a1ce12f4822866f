use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use arc_swap::{ArcSwap, ArcSwapOption};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::api::ScopeConfig;
use crate::core::{AutoscaleTuning, Table};
use crate::error::{ScopeError, ScopeResult};
use crate::plot::{
    AxesGrid, Figure, PlotRequest, PlotSpec, StaticRenderer, compute_line_data, series_inputs,
};
use crate::render::{FrameStyle, Renderer};
use crate::source::{BoxedDataSource, DataSource};

use super::autoscale::autoscale_axes;
use super::sampler::{Sampler, Tick};
use super::snapshot::EngineSnapshot;
use super::strategy::{RedrawHook, UpdateStrategy};
use super::{EngineMode, PlotSession};

/// Lifecycle of a [`RealtimeEngine`]. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Created,
    Running,
    Stopped,
    Closed,
}

/// Callback receiving the error that ended the sampling loop.
pub type TickErrorHook = Arc<dyn Fn(&ScopeError) + Send + Sync>;

struct Surface<R> {
    figure: Figure,
    renderer: R,
}

impl<R: Renderer> Surface<R> {
    fn redraw(&mut self, style: &FrameStyle) -> ScopeResult<UpdateStrategy> {
        let strategy = UpdateStrategy::for_backend(&self.renderer.backend())?;
        strategy.apply(&mut self.figure, &mut self.renderer, style)?;
        Ok(strategy)
    }
}

/// State shared between the foreground handle and the sampling thread.
///
/// The figure and renderer live behind one lock so a tick and a foreground
/// draw never interleave. The session is swapped whole and read once per
/// tick while that lock is held.
struct Shared<R> {
    source: Mutex<BoxedDataSource>,
    surface: Mutex<Surface<R>>,
    session: ArcSwapOption<PlotSession>,
    table: ArcSwap<Table>,
    tuning: AutoscaleTuning,
    style: FrameStyle,
    ticks: AtomicU64,
    generation: AtomicU64,
    redraw_hook: Mutex<Option<RedrawHook>>,
    tick_error_hook: Mutex<Option<TickErrorHook>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> ScopeResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| ScopeError::InvalidData(format!("{what} lock poisoned")))
}

impl<R: Renderer> Shared<R> {
    fn surface(&self) -> ScopeResult<MutexGuard<'_, Surface<R>>> {
        lock(&self.surface, "surface")
    }

    fn redraw_hook(&self) -> ScopeResult<Option<RedrawHook>> {
        Ok(lock(&self.redraw_hook, "redraw hook")?.clone())
    }

    fn notify(&self, strategy: UpdateStrategy) -> ScopeResult<()> {
        strategy.notify(self.redraw_hook()?.as_ref());
        Ok(())
    }
}

impl<R: Renderer + 'static> Tick for Shared<R> {
    fn tick(&self) -> ScopeResult<()> {
        let started = Instant::now();
        let table = Arc::new(lock(&self.source, "data source")?.update()?);
        self.table.store(Arc::clone(&table));
        let tick = self.ticks.fetch_add(1, Ordering::AcqRel) + 1;

        let strategy = {
            let mut surface = self.surface()?;
            let Some(session) = self.session.load_full() else {
                trace!(tick, rows = table.row_count(), "tick without active plot");
                return Ok(());
            };
            if let Some(grid) = surface.figure.grid_mut() {
                refresh_lines(grid, &session, &table)?;
                autoscale_axes(
                    grid,
                    session.autoscale_x(),
                    session.autoscale_y(),
                    self.tuning,
                );
            }
            surface.redraw(&self.style)?
        };
        self.notify(strategy)?;

        trace!(
            tick,
            rows = table.row_count(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "tick"
        );
        Ok(())
    }

    fn tick_failed(&self, error: &ScopeError) {
        let hook = match self.tick_error_hook.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };
        if let Some(hook) = hook {
            hook(error);
        }
    }
}

/// Recomputes every line of `grid` from `table` using the session's series,
/// transforms and window.
fn refresh_lines(grid: &mut AxesGrid, session: &PlotSession, table: &Table) -> ScopeResult<()> {
    let spec = session.spec();
    for cell in grid.cells_mut() {
        for line in cell.lines_mut() {
            let (x, y) = series_inputs(spec, line.origin())?;
            let (x_data, y_data) = compute_line_data(table, x, y, session.window_size())?;
            line.set_data(x_data, y_data)?;
        }
    }
    Ok(())
}

/// Realtime plotting engine: a figure refreshed from a data source on a
/// fixed cadence.
///
/// In interactive mode a background thread ticks every interval. Otherwise
/// the host drives updates by calling [`RealtimeEngine::tick`] from its own
/// loop. Dropping the engine stops the loop and closes it.
pub struct RealtimeEngine<R: Renderer + 'static> {
    shared: Arc<Shared<R>>,
    sampler: Option<Sampler>,
    interval: Duration,
    state: EngineState,
}

impl<R: Renderer + 'static> RealtimeEngine<R> {
    /// Reads the initial table and, when `config.interactive` is set,
    /// starts the sampling loop.
    pub fn new<S>(config: &ScopeConfig, mut source: S, renderer: R) -> ScopeResult<Self>
    where
        S: DataSource + 'static,
    {
        config.validate()?;
        let table = source.init()?;
        let figure = Figure::new(config.viewport, config.show_toolbar)?;
        info!(
            source = %config.source,
            rows = table.row_count(),
            columns = table.column_count(),
            backend = %renderer.backend(),
            interactive = config.interactive,
            "opened realtime engine"
        );

        let shared = Arc::new(Shared {
            source: Mutex::new(Box::new(source)),
            surface: Mutex::new(Surface { figure, renderer }),
            session: ArcSwapOption::empty(),
            table: ArcSwap::from_pointee(table),
            tuning: config.autoscale,
            style: FrameStyle::default(),
            ticks: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            redraw_hook: Mutex::new(None),
            tick_error_hook: Mutex::new(None),
        });
        let mut engine = Self {
            shared,
            sampler: None,
            interval: config.tick_interval(),
            state: EngineState::Created,
        };
        if config.interactive {
            engine.start()?;
        }
        Ok(engine)
    }

    fn ensure_open(&self) -> ScopeResult<()> {
        if self.state == EngineState::Closed {
            return Err(ScopeError::EngineClosed);
        }
        Ok(())
    }

    /// Lays out and draws a new plot, replacing any previous one.
    ///
    /// The grid is built completely before it is installed, so a failing
    /// call leaves the previous plot untouched.
    pub fn plot(&self, request: PlotRequest) -> ScopeResult<()> {
        self.ensure_open()?;
        let table = self.shared.table.load_full();
        let spec = PlotSpec::resolve(&request, &table)?;
        let grid = StaticRenderer::new(self.shared.tuning).draw(&spec, &table)?;
        let (rows, cols) = grid.shape();
        let lines = grid.line_count();
        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let session = Arc::new(PlotSession::new(spec, generation));

        let mut surface = self.shared.surface()?;
        surface.figure.install_grid(grid);
        self.shared.session.store(Some(session));
        drop(surface);

        debug!(generation, rows, cols, lines, "installed plot");
        Ok(())
    }

    /// Runs one tick on the calling thread.
    pub fn tick(&self) -> ScopeResult<()> {
        self.ensure_open()?;
        self.shared.tick()
    }

    /// Starts the sampling loop. A no-op while it is already running.
    ///
    /// A loop that ended on a fatal error must be collected first; that
    /// error is returned here once.
    pub fn start(&mut self) -> ScopeResult<()> {
        self.ensure_open()?;
        if self.sampler.as_ref().is_some_and(|sampler| !sampler.is_finished()) {
            return Ok(());
        }
        if let Some(finished) = self.sampler.take() {
            self.state = EngineState::Stopped;
            finished.stop()?;
        }
        let shared: Arc<Shared<R>> = Arc::clone(&self.shared);
        self.sampler = Some(Sampler::spawn(shared, self.interval)?);
        self.state = EngineState::Running;
        Ok(())
    }

    /// Stops the sampling loop and waits for it to exit.
    ///
    /// Idempotent. Returns the error that ended the loop, once.
    pub fn stop(&mut self) -> ScopeResult<()> {
        let Some(sampler) = self.sampler.take() else {
            return Ok(());
        };
        let result = sampler.stop();
        if self.state != EngineState::Closed {
            self.state = EngineState::Stopped;
        }
        info!(failed = result.is_err(), "stopped realtime engine");
        result
    }

    /// Stops the loop, releases the renderer and closes the data source.
    ///
    /// Terminal: every later call except `stop`/`close` fails with
    /// [`ScopeError::EngineClosed`].
    pub fn close(&mut self) -> ScopeResult<()> {
        if self.state == EngineState::Closed {
            return Ok(());
        }
        let stopped = self.stop();
        self.state = EngineState::Closed;
        self.shared.session.store(None);

        let released = self
            .shared
            .surface()
            .and_then(|mut surface| surface.renderer.release());
        let closed = lock(&self.shared.source, "data source").and_then(|mut source| source.close());
        info!("closed realtime engine");
        stopped.and(released).and(closed)
    }

    /// Enables or disables autoscaling; `y = None` applies `x` to both axes.
    pub fn autoscale(&self, x: bool, y: Option<bool>) -> ScopeResult<()> {
        self.ensure_open()?;
        let y = y.unwrap_or(x);
        let previous = self.shared.session.rcu(|current| {
            current
                .as_ref()
                .map(|session| Arc::new(session.with_autoscale(x, y)))
        });
        match previous {
            Some(_) => debug!(x, y, "autoscale updated"),
            None => debug!(x, y, "autoscale ignored without an active plot"),
        }
        Ok(())
    }

    /// Applies the autoscale policy once, outside the tick cadence.
    ///
    /// Returns the number of rescaled axes.
    pub fn autoscale_axes(&self) -> ScopeResult<usize> {
        self.ensure_open()?;
        let mut surface = self.shared.surface()?;
        let Some(session) = self.shared.session.load_full() else {
            return Ok(0);
        };
        Ok(surface.figure.grid_mut().map_or(0, |grid| {
            autoscale_axes(
                grid,
                session.autoscale_x(),
                session.autoscale_y(),
                self.shared.tuning,
            )
        }))
    }

    /// Replaces the trailing window used by every line from the next tick on.
    pub fn set_window_size(&self, window_size: Option<usize>) -> ScopeResult<()> {
        self.ensure_open()?;
        let previous = self.shared.session.rcu(|current| {
            current
                .as_ref()
                .map(|session| Arc::new(session.with_window_size(window_size)))
        });
        if previous.is_none() {
            debug!(?window_size, "window size ignored without an active plot");
        }
        Ok(())
    }

    /// Drops the active plot and redraws a blank figure.
    pub fn clear(&self) -> ScopeResult<()> {
        self.ensure_open()?;
        let strategy = {
            let mut surface = self.shared.surface()?;
            surface.figure.clear();
            self.shared.session.store(None);
            surface.redraw(&self.shared.style)?
        };
        debug!("cleared figure");
        self.shared.notify(strategy)
    }

    /// Foreground redraw, serialized against ticks.
    pub fn redraw(&self) -> ScopeResult<()> {
        self.ensure_open()?;
        let strategy = self.shared.surface()?.redraw(&self.shared.style)?;
        self.shared.notify(strategy)
    }

    #[must_use]
    pub fn mode(&self) -> EngineMode {
        if self.shared.session.load().is_some() {
            EngineMode::Plot
        } else {
            EngineMode::None
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sampler
            .as_ref()
            .is_some_and(|sampler| !sampler.is_finished())
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        match self.state {
            EngineState::Running if !self.is_running() => EngineState::Stopped,
            state => state,
        }
    }

    /// Most recent table pulled from the data source.
    #[must_use]
    pub fn table(&self) -> Arc<Table> {
        self.shared.table.load_full()
    }

    /// Current plot session, `None` in mode none.
    #[must_use]
    pub fn session(&self) -> Option<Arc<PlotSession>> {
        self.shared.session.load_full()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    pub fn with_figure<T>(&self, f: impl FnOnce(&Figure) -> T) -> ScopeResult<T> {
        Ok(f(&self.shared.surface()?.figure))
    }

    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> ScopeResult<T> {
        Ok(f(&self.shared.surface()?.renderer))
    }

    /// Registers the host repaint callback used by hosted backends.
    pub fn set_redraw_hook(&self, hook: RedrawHook) -> ScopeResult<()> {
        *lock(&self.shared.redraw_hook, "redraw hook")? = Some(hook);
        Ok(())
    }

    /// Registers a callback run on the sampling thread with the error that
    /// ends the loop.
    pub fn on_tick_error<F>(&self, hook: F) -> ScopeResult<()>
    where
        F: Fn(&ScopeError) + Send + Sync + 'static,
    {
        *lock(&self.shared.tick_error_hook, "tick error hook")? = Some(Arc::new(hook));
        Ok(())
    }

    pub fn snapshot(&self) -> ScopeResult<EngineSnapshot> {
        let surface = self.shared.surface()?;
        let session = self.shared.session.load_full();
        let (window_size, autoscale_x, autoscale_y) =
            EngineSnapshot::session_fields(session.as_deref());
        let grid = surface.figure.grid();
        Ok(EngineSnapshot {
            state: self.state(),
            mode: self.mode(),
            tick_count: self.tick_count(),
            redraw_count: surface.figure.redraw_count(),
            table_rows: self.shared.table.load().row_count(),
            window_size,
            autoscale_x,
            autoscale_y,
            shape: grid.map(AxesGrid::shape),
            cells: grid.map(EngineSnapshot::cells_of).unwrap_or_default(),
        })
    }
}

impl<R: Renderer + 'static> Drop for RealtimeEngine<R> {
    fn drop(&mut self) {
        if self.state == EngineState::Closed {
            return;
        }
        if let Err(err) = self.close() {
            warn!(error = %err, "realtime engine closed with error");
        }
    }
}

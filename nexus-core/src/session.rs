//! Fetch lifecycle and displayed state for one paper.
//!
//! Host-driven and single-threaded: the host performs the HTTP calls and
//! reports timestamps, the session decides which responses still count.
//!
//! Each view (main / cited-by) has its own generation counter. A fetch gets a
//! ticket carrying the generation it was issued under; a response whose
//! ticket no longer matches the view's pending request (superseded, timed
//! out, or the session torn down) is discarded without touching any state.
//! Layout only ever runs on a single complete payload.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{check_radius, LayoutConfig, SessionConfig};
use crate::error::{FetchError, GraphError, LayoutError, LayoutResult};
use crate::fetch::{build_request, read_response, GraphQuery, HttpRequest, HttpResponse, ViewKind};
use crate::graph::split;
use crate::interaction::{HoverTarget, InteractionState};
use crate::layout::{arrange, place, Arrangement, GraphLayout, PointF};
use crate::output::RenderFrame;

/// Identifies one issued fetch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTicket {
    pub view: ViewKind,
    pub generation: u64,
}

/// A fetch the host should now perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchStart {
    pub ticket: FetchTicket,
    pub request: HttpRequest,
    /// Earlier in-flight fetch for the same view; the host may abort it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded: Option<FetchTicket>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// A newer fetch replaced it, or it already timed out.
    Stale,
    /// The session was torn down.
    TornDown,
}

/// What happened to a reported response.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Applied,
    Failed(GraphError),
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    generation: u64,
    started_ms: f64,
}

#[derive(Debug, Clone, Default)]
struct ViewSlot {
    generation: u64,
    pending: Option<Pending>,
    arrangement: Option<Arrangement>,
    error: Option<GraphError>,
}

impl ViewSlot {
    fn fail(&mut self, error: GraphError) {
        self.arrangement = None;
        self.error = Some(error);
    }
}

#[derive(Debug, Clone)]
pub struct GraphSession {
    layout_cfg: LayoutConfig,
    session_cfg: SessionConfig,
    main: ViewSlot,
    cited_by: ViewSlot,
    active: ViewKind,
    max_radius: f64,
    torn_down: bool,
    interaction: InteractionState,
    layout: Option<GraphLayout>,
    layout_error: Option<LayoutError>,
}

impl GraphSession {
    pub fn new(layout_cfg: LayoutConfig, session_cfg: SessionConfig) -> LayoutResult<Self> {
        layout_cfg.validate()?;
        Ok(Self {
            max_radius: layout_cfg.default_max_radius,
            layout_cfg,
            session_cfg,
            main: ViewSlot::default(),
            cited_by: ViewSlot::default(),
            active: ViewKind::Main,
            torn_down: false,
            interaction: InteractionState::new(),
            layout: None,
            layout_error: None,
        })
    }

    fn slot(&self, view: ViewKind) -> &ViewSlot {
        match view {
            ViewKind::Main => &self.main,
            ViewKind::CitedBy => &self.cited_by,
        }
    }

    fn slot_mut(&mut self, view: ViewKind) -> &mut ViewSlot {
        match view {
            ViewKind::Main => &mut self.main,
            ViewKind::CitedBy => &mut self.cited_by,
        }
    }

    // ========================================================================
    // Fetch lifecycle
    // ========================================================================

    /// Start a fetch for `view`. Returns `None` once torn down.
    pub fn begin_fetch(&mut self, view: ViewKind, query: &GraphQuery, now_ms: f64) -> Option<FetchStart> {
        if self.torn_down {
            warn!("fetch for {:?} requested after teardown", view);
            return None;
        }
        let request = build_request(view, query, &self.session_cfg);

        let slot = self.slot_mut(view);
        slot.generation += 1;
        let superseded = slot.pending.take().map(|p| FetchTicket { view, generation: p.generation });
        slot.pending = Some(Pending { generation: slot.generation, started_ms: now_ms });
        slot.error = None;
        let ticket = FetchTicket { view, generation: slot.generation };

        debug!("fetch {:?} gen {} -> {}", view, ticket.generation, request.url);
        Some(FetchStart { ticket, request, superseded })
    }

    /// Report the outcome of a fetch.
    pub fn resolve(&mut self, ticket: FetchTicket, outcome: Result<HttpResponse, FetchError>) -> Resolution {
        if self.torn_down {
            debug!("discarding {:?} gen {}: torn down", ticket.view, ticket.generation);
            return Resolution::Discarded(DiscardReason::TornDown);
        }

        let slot = self.slot_mut(ticket.view);
        if slot.pending.map(|p| p.generation) != Some(ticket.generation) {
            warn!("discarding stale response for {:?} gen {}", ticket.view, ticket.generation);
            return Resolution::Discarded(DiscardReason::Stale);
        }
        slot.pending = None;

        let arranged = outcome
            .and_then(|response| read_response(&response))
            .map_err(GraphError::from)
            .and_then(|payload| arrange(&split(&payload), &self.layout_cfg).map_err(GraphError::from));

        let resolution = {
            let slot = self.slot_mut(ticket.view);
            match arranged {
                Ok(arrangement) => {
                    slot.arrangement = Some(arrangement);
                    slot.error = None;
                    Resolution::Applied
                }
                Err(e) => {
                    warn!("fetch {:?} gen {} failed: {}", ticket.view, ticket.generation, e);
                    slot.fail(e.clone());
                    Resolution::Failed(e)
                }
            }
        };

        if ticket.view == self.active {
            self.interaction.clear();
            self.refresh_layout();
        }
        resolution
    }

    /// Cancel fetches outstanding for longer than the configured timeout.
    /// Returns their tickets so the host can abort the underlying requests.
    pub fn poll_timeouts(&mut self, now_ms: f64) -> Vec<FetchTicket> {
        let timeout_ms = self.session_cfg.fetch_timeout_ms;
        let mut expired = Vec::new();

        for view in [ViewKind::Main, ViewKind::CitedBy] {
            let slot = self.slot_mut(view);
            let Some(p) = slot.pending else { continue };
            if now_ms - p.started_ms >= timeout_ms as f64 {
                slot.pending = None;
                slot.fail(FetchError::Timeout { timeout_ms }.into());
                warn!("fetch {:?} gen {} timed out", view, p.generation);
                expired.push(FetchTicket { view, generation: p.generation });
            }
        }

        if expired.iter().any(|t| t.view == self.active) {
            self.interaction.clear();
            self.refresh_layout();
        }
        expired
    }

    /// The owner went away. Every later response is discarded.
    pub fn teardown(&mut self) -> Vec<FetchTicket> {
        self.torn_down = true;
        let mut aborted = Vec::new();
        for view in [ViewKind::Main, ViewKind::CitedBy] {
            if let Some(p) = self.slot_mut(view).pending.take() {
                aborted.push(FetchTicket { view, generation: p.generation });
            }
        }
        aborted
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn is_loading(&self, view: ViewKind) -> bool {
        self.slot(view).pending.is_some()
    }

    pub fn error(&self, view: ViewKind) -> Option<&GraphError> {
        self.slot(view).error.as_ref()
    }

    // ========================================================================
    // Displayed graph
    // ========================================================================

    pub fn active_view(&self) -> ViewKind {
        self.active
    }

    /// Switch between main and cited-by using the already fetched data.
    pub fn toggle_view(&mut self) -> ViewKind {
        self.set_view(self.active.other());
        self.active
    }

    pub fn set_view(&mut self, view: ViewKind) {
        if view == self.active {
            return;
        }
        self.active = view;
        self.interaction.clear();
        self.refresh_layout();
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Re-place the current arrangement at a new radius. Grouping and angles
    /// are reused as they are.
    pub fn set_max_radius(&mut self, max_radius: f64) -> LayoutResult<()> {
        check_radius("max_radius", max_radius)?;
        self.max_radius = max_radius;
        self.refresh_layout();
        Ok(())
    }

    /// Viewport changed; its shorter side is `shortest_dimension`.
    pub fn resize(&mut self, shortest_dimension: f64) -> LayoutResult<()> {
        self.set_max_radius(self.layout_cfg.max_radius_for_viewport(shortest_dimension))
    }

    pub fn layout(&self) -> Option<&GraphLayout> {
        self.layout.as_ref()
    }

    fn refresh_layout(&mut self) {
        let placed = self
            .slot(self.active)
            .arrangement
            .as_ref()
            .map(|a| place(a, &self.layout_cfg, self.max_radius));

        match placed {
            Some(Ok(layout)) => {
                self.layout = Some(layout);
                self.layout_error = None;
            }
            Some(Err(e)) => {
                warn!("layout failed: {}", e);
                self.layout = None;
                self.layout_error = Some(e);
            }
            None => {
                self.layout = None;
                self.layout_error = None;
            }
        }
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn pointer_enter(&mut self, target: HoverTarget, pointer: PointF) {
        self.interaction.pointer_enter(target, pointer);
    }

    pub fn pointer_move(&mut self, pointer: PointF) -> bool {
        self.interaction.pointer_move(pointer)
    }

    pub fn pointer_leave(&mut self, target: &HoverTarget) -> bool {
        self.interaction.pointer_leave(target)
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn frame(&self) -> RenderFrame {
        let error = self
            .error(self.active)
            .cloned()
            .or_else(|| self.layout_error.clone().map(GraphError::from));

        RenderFrame::build(self.layout.as_ref(), &self.interaction, &self.layout_cfg)
            .with_max_radius(self.max_radius)
            .with_view(self.active, self.is_loading(self.active))
            .with_error(error.as_ref())
    }
}

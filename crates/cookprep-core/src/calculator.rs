//! The per-board preparation engine.
//!
//! A [`PreparationCalculator`] belongs to one recipe board. It keeps the
//! board bound to its nearest eligible station, lazily computes a
//! [`PreparationPlan`] when the player looks at the board, and turns the
//! plan into a status line and, on confirm, into slot changes.
//!
//! Every handler runs synchronously inside a host callback. Host events that
//! can make the plan stale (binding change, slot change, inventory refresh)
//! simply drop it; the next observation recomputes.

use crate::binder::StationBinder;
use crate::config::PrepConfig;
use crate::fixed::{Fixed64, Position};
use crate::flags::{Color, DeficiencyFlags};
use crate::focus::FocusTracker;
use crate::id::{BoardId, SlotId, StationIndex};
use crate::plan::{ApplyReport, PreparationPlan};
use crate::registry::RecipeDef;
use crate::rng::PrepRng;
use crate::station::{BoardInfo, Readiness, StationInfo};
use crate::status::{BlockReason, BusyReason, InteractionState, Status, StatusText};
use crate::world::{BoardLabels, World};

/// What the host knows about the player on an observation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    pub observer: Position,
    /// A menu covers the screen.
    pub menu_open: bool,
    /// The player is mid-action (placing, eating, ...).
    pub hands_busy: bool,
    /// The confirm input went down this tick.
    pub confirm: bool,
}

impl Observation {
    pub fn at(observer: Position) -> Self {
        Self {
            observer,
            ..Self::default()
        }
    }

    pub fn confirming(mut self) -> Self {
        self.confirm = true;
        self
    }
}

#[derive(Debug)]
pub struct PreparationCalculator {
    board: BoardInfo,
    recipe: RecipeDef,
    title: String,
    binder: StationBinder,
    plan: PreparationPlan,
    flags: DeficiencyFlags,
    focus: FocusTracker,
    state: InteractionState,
    rng: Option<PrepRng>,
    use_distance: Fixed64,
    alert_color: Color,
    refuel_on_confirm: bool,
    last_apply: Option<ApplyReport>,
    killed: bool,
}

impl PreparationCalculator {
    /// Create a calculator for `board`. `title` is the recipe result's
    /// display name. The calculator starts unbound; call
    /// [`attach`](Self::attach) to bind it.
    pub fn new(board: BoardInfo, recipe: RecipeDef, title: impl Into<String>, config: &PrepConfig) -> Self {
        let use_distance = config.use_distance_fixed();
        let rng = config
            .shuffle_ingredients
            .then(|| config.make_rng(u64::from(board.id.0)));
        Self {
            binder: StationBinder::new(board.position, use_distance, recipe.kind),
            board,
            recipe,
            title: title.into(),
            plan: PreparationPlan::default(),
            flags: DeficiencyFlags::new(),
            focus: FocusTracker::new(),
            state: InteractionState::Idle,
            rng,
            use_distance,
            alert_color: config.alert_color,
            refuel_on_confirm: config.refuel_on_confirm,
            last_apply: None,
            killed: false,
        }
    }

    pub fn board(&self) -> &BoardInfo {
        &self.board
    }

    pub fn board_id(&self) -> BoardId {
        self.board.id
    }

    pub fn recipe(&self) -> &RecipeDef {
        &self.recipe
    }

    pub fn plan(&self) -> &PreparationPlan {
        &self.plan
    }

    pub fn flags(&self) -> &DeficiencyFlags {
        &self.flags
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn bound_station(&self) -> Option<&StationInfo> {
        self.binder.bound()
    }

    /// Report from the most recent plan application, if any.
    pub fn last_apply(&self) -> Option<&ApplyReport> {
        self.last_apply.as_ref()
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Bind to the nearest eligible station currently in the world.
    pub fn attach<W: World + ?Sized>(&mut self, world: &mut W) {
        if self.killed {
            return;
        }
        let stations = world.placed_stations();
        if self.binder.rebind(&stations) {
            tracing::debug!(board = self.board.id.0, station = ?self.binder.bound_index(), "bound station");
            self.invalidate(world);
        }
    }

    /// Detach for good. Restores labels and hides the status if this board
    /// had focus. A killed calculator ignores every later call.
    pub fn kill<W: World + ?Sized>(&mut self, world: &mut W) {
        if self.killed {
            return;
        }
        self.binder.clear();
        self.invalidate(world);
        if self.state.is_focused() {
            world.hide_status();
        }
        self.state = InteractionState::Idle;
        self.focus.reset();
        self.killed = true;
    }

    // -----------------------------------------------------------------------
    // Host events
    // -----------------------------------------------------------------------

    pub fn on_station_placed<W: World + ?Sized>(&mut self, world: &mut W, station: &StationInfo) {
        if self.killed {
            return;
        }
        if self.binder.on_station_placed(station) {
            tracing::debug!(board = self.board.id.0, station = station.index.0, "rebound to closer station");
            self.invalidate(world);
        }
    }

    pub fn on_station_removed<W: World + ?Sized>(&mut self, world: &mut W, station: StationIndex) {
        if self.killed {
            return;
        }
        if self.binder.on_station_removed(station) {
            tracing::debug!(board = self.board.id.0, station = station.0, "bound station removed");
            self.invalidate(world);
        }
    }

    /// A station slot changed contents. Only slots of the bound station
    /// matter.
    pub fn on_slot_changed<W: World + ?Sized>(&mut self, world: &mut W, slot: SlotId) {
        if self.killed || self.binder.bound_index() != Some(slot.station) {
            return;
        }
        self.invalidate(world);
    }

    pub fn on_inventory_refreshed<W: World + ?Sized>(&mut self, world: &mut W) {
        if self.killed {
            return;
        }
        self.invalidate(world);
    }

    /// The player stopped looking at the board.
    pub fn focus_lost<W: World + ?Sized>(&mut self, world: &mut W) {
        self.release_focus(world, true);
    }

    /// Close a frame. Synthesises a focus loss if the board was observed
    /// last frame but not this one, and returns true in that case. The
    /// status is hidden only when `shows_status` says this board still owns
    /// it; another board may have taken it over this frame.
    pub fn end_frame<W: World + ?Sized>(&mut self, world: &mut W, shows_status: bool) -> bool {
        if self.killed || !self.focus.end_frame() {
            return false;
        }
        self.release_focus(world, shows_status);
        true
    }

    fn release_focus<W: World + ?Sized>(&mut self, world: &mut W, hide: bool) {
        if self.killed {
            return;
        }
        self.focus.reset();
        self.state = InteractionState::Idle;
        self.invalidate(world);
        if hide {
            world.hide_status();
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// One observation tick while the player looks at the board. Presents
    /// the matching status and, on confirm, acts on it.
    pub fn observe<W: World + ?Sized>(&mut self, world: &mut W, obs: &Observation) -> InteractionState {
        if self.killed {
            return InteractionState::Idle;
        }
        let _span = tracing::debug_span!("observe", recipe = %self.recipe.name, board = self.board.id.0).entered();
        self.focus.mark_observed();

        if obs.menu_open || obs.hands_busy || !obs.observer.within(&self.board.position, self.use_distance) {
            world.hide_status();
            self.state = InteractionState::Idle;
            return self.state;
        }

        let Ok(station) = self.binder.require() else {
            self.present(world, StatusText::NoStation(self.recipe.kind));
            self.state = InteractionState::FocusedUnbound;
            return self.state;
        };

        if obs.confirm && self.refuel_on_confirm {
            top_up_fuel(world, station);
        }

        if !self.plan.is_calculated() {
            self.calculate(world, station);
        }

        self.state = self.evaluate(world, station, obs.confirm);
        self.state
    }

    fn evaluate<W: World + ?Sized>(&mut self, world: &mut W, station: StationIndex, confirm: bool) -> InteractionState {
        let kind = self.recipe.kind;

        let missing = self.plan.unsatisfied().len();
        if missing > 0 {
            self.present(world, StatusText::Missing(missing));
            return InteractionState::Blocked(BlockReason::MissingIngredients(missing));
        }

        if !self.plan.is_consistent() {
            self.present(world, StatusText::UnableToPrepare);
            return InteractionState::Blocked(BlockReason::Inconsistent);
        }

        if self.plan.items_to_place().is_empty() {
            let busy = match world.readiness(station) {
                Readiness::Cooking => Some((BusyReason::Cooking, StatusText::StationBusy(kind))),
                Readiness::NoFuel => Some((BusyReason::NoFuel, StatusText::NoFuel(kind))),
                Readiness::NoPower => Some((BusyReason::NoPower, StatusText::NoPower(kind))),
                Readiness::Idle => None,
            };
            if let Some((reason, text)) = busy {
                self.present(world, text);
                return InteractionState::Busy(reason);
            }

            self.present(world, StatusText::StartCooking);
            if confirm {
                tracing::debug!(station = station.0, "starting to cook");
                world.start_cooking(station);
                self.invalidate(world);
            }
            return InteractionState::ReadyToCook;
        }

        self.present(world, StatusText::Prepare);
        if confirm {
            match self.plan.apply(world, self.rng.as_mut()) {
                Ok(report) => self.last_apply = Some(report),
                Err(err) => tracing::warn!(%err, "preparation not applied"),
            }
            self.invalidate(world);
        }
        InteractionState::ReadyToPrepare
    }

    /// Recompute the plan from the bound station and mark uncovered cost
    /// entries on the board.
    fn calculate<W: World + ?Sized>(&mut self, world: &mut W, station: StationIndex) {
        self.invalidate(world);

        let slots = world.slots(station);
        self.plan = PreparationPlan::calculate(&self.recipe.costs, &slots, |item| world.inventory_count(item));

        let mut labels = BoardLabels::new(world, self.board.id);
        for &index in self.plan.unsatisfied() {
            self.flags.mark_deficient(index, self.alert_color, &mut labels);
        }

        if self.plan.unsatisfied().is_empty() && !self.plan.is_consistent() {
            tracing::warn!(
                slots = self.plan.slots_to_replace().len(),
                items = self.plan.items_to_place().len(),
                "{}: slot and ingredient counts disagree, not preparing",
                self.title
            );
        }
        tracing::debug!(
            to_replace = self.plan.slots_to_replace().len(),
            to_place = self.plan.items_to_place().len(),
            unsatisfied = self.plan.unsatisfied().len(),
            "calculated preparation"
        );
    }

    /// Drop the plan and restore any highlighted labels.
    fn invalidate<W: World + ?Sized>(&mut self, world: &mut W) {
        self.plan.clear();
        if !self.flags.is_empty() {
            self.flags.clear_all(&mut BoardLabels::new(world, self.board.id));
        }
    }

    fn present<W: World + ?Sized>(&self, world: &mut W, text: StatusText) {
        world.present_status(&Status::new(self.title.clone(), text));
    }
}

/// Fill the station's fuel tank from the player's inventory, as far as both
/// allow.
fn top_up_fuel<W: World + ?Sized>(world: &mut W, station: StationIndex) {
    let Some(gauge) = world.fuel(station) else {
        return;
    };
    if gauge.is_full() {
        return;
    }
    let amount = world.inventory_count(gauge.fuel_item).min(gauge.headroom());
    if amount > 0 {
        tracing::debug!(station = station.0, amount, "adding fuel");
        world.add_fuel(station, amount);
    }
}

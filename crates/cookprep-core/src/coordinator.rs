//! Process-wide owner of every live calculator.
//!
//! The host creates one [`Coordinator`] when the add-on loads, calls
//! [`Coordinator::start`] to pick up boards already in the world, forwards
//! [`HostEvent`]s through [`Coordinator::dispatch`], and calls
//! [`Coordinator::shutdown`] on unload. Handlers that remove calculators
//! snapshot the key set first, so removal never races iteration.

use crate::calculator::{Observation, PreparationCalculator};
use crate::config::PrepConfig;
use crate::event::HostEvent;
use crate::id::{BoardId, CalculatorId, RecipeId};
use crate::registry::Registry;
use crate::station::BoardInfo;
use crate::status::InteractionState;
use crate::world::World;
use slotmap::SlotMap;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    #[error("board {board:?} shows unknown recipe {recipe:?}")]
    UnknownRecipe { board: BoardId, recipe: RecipeId },
    #[error("no calculator for board {0:?}")]
    UnknownBoard(BoardId),
}

#[derive(Debug)]
pub struct Coordinator {
    registry: Registry,
    config: PrepConfig,
    calculators: SlotMap<CalculatorId, PreparationCalculator>,
    by_board: HashMap<BoardId, CalculatorId>,
    /// Board whose status the host is currently showing.
    presenter: Option<BoardId>,
}

impl Coordinator {
    pub fn new(registry: Registry, config: PrepConfig) -> Self {
        Self {
            registry,
            config,
            calculators: SlotMap::with_key(),
            by_board: HashMap::new(),
            presenter: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    pub fn get(&self, id: CalculatorId) -> Option<&PreparationCalculator> {
        self.calculators.get(id)
    }

    pub fn calculator_for(&self, board: BoardId) -> Option<&PreparationCalculator> {
        self.by_board.get(&board).and_then(|&id| self.calculators.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CalculatorId, &PreparationCalculator)> {
        self.calculators.iter()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Drop anything left over from a previous session, then attach a
    /// calculator to every board in the world. Boards with an unknown
    /// recipe are logged and skipped.
    pub fn start<W: World + ?Sized>(&mut self, world: &mut W) -> usize {
        self.shutdown(world);
        for board in world.placed_boards() {
            if let Err(err) = self.spawn(world, board) {
                tracing::warn!(%err, "skipping recipe board");
            }
        }
        tracing::debug!(calculators = self.calculators.len(), "coordinator started");
        self.calculators.len()
    }

    /// Attach a calculator to `board`. A board keeps at most one live
    /// calculator; spawning again returns the existing one.
    pub fn spawn<W: World + ?Sized>(&mut self, world: &mut W, board: BoardInfo) -> Result<CalculatorId, CoordinatorError> {
        if let Some(&existing) = self.by_board.get(&board.id) {
            if self.calculators.get(existing).is_some_and(|c| !c.is_killed()) {
                return Ok(existing);
            }
        }

        let recipe = self
            .registry
            .get_recipe(board.recipe)
            .ok_or(CoordinatorError::UnknownRecipe {
                board: board.id,
                recipe: board.recipe,
            })?
            .clone();
        let title = self.registry.display_name(recipe.result);

        let mut calculator = PreparationCalculator::new(board, recipe, title, &self.config);
        calculator.attach(world);
        let id = self.calculators.insert(calculator);
        self.by_board.insert(board.id, id);
        Ok(id)
    }

    /// Kill and forget a calculator. Returns false if it was already gone.
    pub fn despawn<W: World + ?Sized>(&mut self, world: &mut W, id: CalculatorId) -> bool {
        let Some(mut calculator) = self.calculators.remove(id) else {
            return false;
        };
        calculator.kill(world);
        let board = calculator.board_id();
        if self.by_board.get(&board) == Some(&id) {
            self.by_board.remove(&board);
        }
        if self.presenter == Some(board) {
            self.presenter = None;
        }
        true
    }

    /// Kill every calculator.
    pub fn shutdown<W: World + ?Sized>(&mut self, world: &mut W) {
        let ids: Vec<CalculatorId> = self.calculators.keys().collect();
        for id in ids {
            self.despawn(world, id);
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub fn dispatch<W: World + ?Sized>(&mut self, world: &mut W, event: HostEvent) {
        tracing::trace!(kind = ?event.kind(), "host event");
        match event {
            HostEvent::StationPlaced(station) => {
                for calculator in self.calculators.values_mut() {
                    calculator.on_station_placed(world, &station);
                }
            }
            HostEvent::StationRemoved(station) => {
                if !station.placed {
                    return;
                }
                for calculator in self.calculators.values_mut() {
                    calculator.on_station_removed(world, station.index);
                }
            }
            HostEvent::SlotChanged(slot) => {
                for calculator in self.calculators.values_mut() {
                    calculator.on_slot_changed(world, slot);
                }
            }
            HostEvent::InventoryRefreshed => {
                for calculator in self.calculators.values_mut() {
                    calculator.on_inventory_refreshed(world);
                }
            }
            HostEvent::BoardPlaced(board) => {
                if let Err(err) = self.spawn(world, board) {
                    tracing::warn!(%err, "ignoring placed recipe board");
                }
            }
            HostEvent::BoardRemoved(board) => {
                if let Some(&id) = self.by_board.get(&board) {
                    self.despawn(world, id);
                }
            }
        }
    }

    /// One observation tick on `board`.
    pub fn observe<W: World + ?Sized>(
        &mut self,
        world: &mut W,
        board: BoardId,
        obs: &Observation,
    ) -> Result<InteractionState, CoordinatorError> {
        let state = self.calculator_mut(board)?.observe(world, obs);
        if state.is_focused() {
            self.presenter = Some(board);
        } else if self.presenter == Some(board) {
            self.presenter = None;
        }
        Ok(state)
    }

    pub fn focus_lost<W: World + ?Sized>(&mut self, world: &mut W, board: BoardId) -> Result<(), CoordinatorError> {
        self.calculator_mut(board)?.focus_lost(world);
        if self.presenter == Some(board) {
            self.presenter = None;
        }
        Ok(())
    }

    /// Close the frame on every calculator. Returns how many had a missed
    /// focus loss synthesised. Only the board that last presented a status
    /// may hide it.
    pub fn end_frame<W: World + ?Sized>(&mut self, world: &mut W) -> usize {
        let mut lost = 0;
        for calculator in self.calculators.values_mut() {
            let shows_status = self.presenter == Some(calculator.board_id());
            if calculator.end_frame(world, shows_status) {
                lost += 1;
                if shows_status {
                    self.presenter = None;
                }
            }
        }
        lost
    }

    fn calculator_mut(&mut self, board: BoardId) -> Result<&mut PreparationCalculator, CoordinatorError> {
        self.by_board
            .get(&board)
            .and_then(|&id| self.calculators.get_mut(id))
            .ok_or(CoordinatorError::UnknownBoard(board))
    }
}

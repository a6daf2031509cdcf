use super::{
    action::{Action, Direction},
    config::{GameConfig, ProgressionMode},
    entities::{Entities, FoodKind, Layer, PlayerSnake},
    grid::{Position, wrap_advance},
    progression::{self, LevelOutcome},
    rival::{self, CrashCause},
    spawner::Spawner,
    state::{CollisionType, GameState, Outcome, Session, Status},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Discrete notifications for audio, popups and stat tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten(FoodKind),
    /// Score crossed a multiple of the milestone step
    Milestone(u32),
    /// Level finished with `score`; play continues on `next_level`
    LevelComplete { next_level: u32, score: u32 },
    /// Final level finished with `score`; play continues on level 1
    AllLevelsCleared { score: u32 },
    GameOver { outcome: Outcome, score: u32 },
    /// The tick timer must be rescheduled at this rate
    TickRateChanged(u32),
    /// A rival crashed and left `food` items behind
    RivalDecomposed {
        id: usize,
        cause: CrashCause,
        food: usize,
    },
}

/// Information about a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Food kinds eaten this step
    pub eaten: Vec<FoodKind>,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// A new level was laid out during this step
    pub level_changed: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepResult {
    /// Whether the run has ended
    pub terminated: bool,
    pub events: Vec<GameEvent>,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    spawner: Spawner,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose random choices are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            spawner: Spawner::new(&config),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh game on level 1, waiting to be started
    pub fn reset(&mut self) -> GameState {
        let player = self.starting_snake();
        let mut state = GameState::new(
            Session::new(1, 0, self.config.base_tick_rate),
            Entities::new(self.config.grid_size, player),
        );
        self.setup_level(&mut state);
        state
    }

    /// Lay out the current level: snake, obstacles, rivals and food.
    ///
    /// Score, milestones, speed and timers start over; the level number and
    /// status are left alone.
    pub fn setup_level(&mut self, state: &mut GameState) {
        let level = state.session.level;
        let status = state.session.status;
        state.session = Session::new(
            level,
            self.target_score(level),
            self.config.base_tick_rate,
        );
        state.session.status = status;

        let entities = &mut state.entities;
        entities.clear_rivals();
        entities.clear_foods();
        entities.clear_obstacles();
        entities.reset_player(self.starting_snake());

        for anchor in progression::obstacle_layout(&self.config, level) {
            entities.add_obstacle(anchor);
        }
        let rivals = rival::generate_rivals(entities, &self.config, level, &mut self.rng);
        for _ in 0..self.config.initial_food_count {
            self.spawner.place_standard_food(entities, &mut self.rng);
        }

        debug!(
            level,
            obstacles = entities.obstacles().len(),
            rivals,
            "level laid out"
        );
    }

    /// Apply a player intent; returns whether it changed anything
    pub fn apply(&mut self, state: &mut GameState, action: Action) -> bool {
        match action {
            Action::Move(direction) => state.request_direction(direction),
            Action::Start => self.start(state),
            Action::TogglePause => {
                let before = state.session.status;
                before != state.toggle_pause()
            }
            Action::Restart => {
                self.restart(state);
                true
            }
        }
    }

    /// Begin play from the ready screen, or start a new run after one ended
    pub fn start(&mut self, state: &mut GameState) -> bool {
        match state.session.status {
            Status::Ready => {}
            Status::Ended(_) => self.setup_level(state),
            Status::Running | Status::Paused => return false,
        }
        state.session.status = Status::Running;
        info!(level = state.session.level, "run started");
        true
    }

    /// Lay the current level out again and wait for start
    pub fn restart(&mut self, state: &mut GameState) {
        state.session.status = Status::Ready;
        self.setup_level(state);
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_running() {
            return StepResult {
                terminated: state.is_ended(),
                ..Default::default()
            };
        }

        let mut result = StepResult::default();
        state.session.ticks += 1;

        // Commit the buffered heading
        let player = state.entities.player_mut();
        player.direction = player.next_direction;
        let direction = player.direction;

        let size = state.entities.size();
        let new_head = wrap_advance(state.entities.player().head(), direction, size);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            result.info.collision_type = Some(collision_type);
            self.end_run(state, Outcome::Lost(collision_type), &mut result);
            return result;
        }

        state.entities.push_player_head(new_head);
        self.consume(state, new_head, &mut result);

        if result.info.eaten.is_empty() {
            state.entities.pop_player_tail();
        } else {
            self.after_consumption(state, &mut result);
            if result.terminated {
                return result;
            }
        }

        state.session.obstacle_timer += 1;
        if state.session.obstacle_timer >= self.config.obstacle_drift_interval {
            state.session.obstacle_timer = 0;
            self.drift_obstacles(&mut state.entities);
        }

        self.update_rivals(state, &mut result);

        result
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        let entities = &state.entities;
        if entities.has(pos, Layer::Player) {
            return Some(CollisionType::SelfCollision);
        }
        if entities.has(pos, Layer::Obstacle) {
            return Some(CollisionType::Obstacle);
        }
        if state.session.level >= self.config.rival_min_level && entities.has(pos, Layer::Rival) {
            return Some(CollisionType::Rival);
        }
        None
    }

    /// Eat whatever lies under the new head; several kinds may go in one tick
    fn consume(&mut self, state: &mut GameState, head: Position, result: &mut StepResult) {
        let entities = &mut state.entities;
        let session = &mut state.session;

        if let Some(food) = entities.take_food_at(head) {
            session.score += if self.config.award_decomposition_value {
                food.value
            } else {
                self.config.food_score
            };
            result.info.eaten.push(FoodKind::Standard);
            self.spawner.place_standard_food(entities, &mut self.rng);
        }

        if entities.big_food_covers(head) {
            entities.take_big_food();
            session.score += self.config.big_food_score;
            result.info.eaten.push(FoodKind::Big);
        }

        if entities.slow_food() == Some(head) {
            entities.take_slow_food();
            session.score += self.config.slow_food_score;
            result.info.eaten.push(FoodKind::Slow);
            let slowed = progression::slowed_tick_rate(&self.config, session.tick_rate);
            set_tick_rate(session, slowed, result);
        }

        result
            .events
            .extend(result.info.eaten.iter().map(|&kind| GameEvent::FoodEaten(kind)));
    }

    /// Milestones, level transitions, speed and bonus food after eating
    fn after_consumption(&mut self, state: &mut GameState, result: &mut StepResult) {
        let session = &mut state.session;
        let score = session.score;
        if let Some(milestone) =
            progression::milestone_reached(&self.config, session.score, session.last_milestone)
        {
            session.last_milestone = milestone;
            result.events.push(GameEvent::Milestone(milestone));
        }

        match progression::evaluate_level(&self.config, session.level, session.score) {
            LevelOutcome::Continue => {}
            LevelOutcome::Advance(next_level) => {
                info!(from = session.level, to = next_level, "level complete");
                session.level = next_level;
                self.setup_level(state);
                result.info.level_changed = true;
                result
                    .events
                    .push(GameEvent::LevelComplete { next_level, score });
                result
                    .events
                    .push(GameEvent::TickRateChanged(state.session.tick_rate));
            }
            LevelOutcome::Cleared => {
                info!("all levels cleared, back to level 1");
                session.level = 1;
                self.setup_level(state);
                result.info.level_changed = true;
                result.events.push(GameEvent::AllLevelsCleared { score });
                result
                    .events
                    .push(GameEvent::TickRateChanged(state.session.tick_rate));
            }
            LevelOutcome::Won => {
                self.end_run(state, Outcome::Won, result);
                return;
            }
        }

        let rate = progression::tick_rate_for_score(&self.config, state.session.score);
        set_tick_rate(&mut state.session, rate, result);

        if self.rng.gen_bool(self.config.big_food_chance) {
            self.spawner.place_big_food(&mut state.entities, &mut self.rng);
        }
        if self.rng.gen_bool(self.config.slow_food_chance) {
            self.spawner.place_slow_food(&mut state.entities, &mut self.rng);
        }
    }

    fn end_run(&mut self, state: &mut GameState, outcome: Outcome, result: &mut StepResult) {
        state.session.status = Status::Ended(outcome);
        if let Outcome::Lost(_) = outcome {
            state.session.level = 1;
            state.entities.clear_rivals();
        }
        info!(
            ?outcome,
            score = state.session.score,
            ticks = state.session.ticks,
            "run ended"
        );
        result.terminated = true;
        result.events.push(GameEvent::GameOver {
            outcome,
            score: state.session.score,
        });
    }

    /// Each obstacle may take one random step near its anchor
    fn drift_obstacles(&mut self, entities: &mut Entities) {
        for index in 0..entities.obstacles().len() {
            if !self.rng.gen_bool(self.config.obstacle_drift_chance) {
                continue;
            }
            let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
            drift_obstacle(
                entities,
                index,
                direction,
                self.config.obstacle_anchor_radius,
            );
        }
    }

    fn update_rivals(&mut self, state: &mut GameState, result: &mut StepResult) {
        if state.entities.rivals().is_empty() {
            return;
        }
        state.session.rival_timer += 1;
        if state.session.rival_timer < progression::rival_cadence(&self.config, state.session.tick_rate)
        {
            return;
        }
        state.session.rival_timer = 0;

        let crashed = rival::update_rivals(
            &mut state.entities,
            &self.config,
            &self.spawner,
            &mut self.rng,
        );
        result.events.extend(crashed.iter().map(|d| GameEvent::RivalDecomposed {
            id: d.rival.id,
            cause: d.cause,
            food: d.food_cells.len(),
        }));
    }

    fn target_score(&self, level: u32) -> u32 {
        match self.config.progression {
            ProgressionMode::Levels => progression::level_target(&self.config, level),
            ProgressionMode::SingleLevel { win_score } => win_score,
        }
    }

    fn starting_snake(&self) -> PlayerSnake {
        let center = self.config.grid_size / 2;
        PlayerSnake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        )
    }
}

/// Try to move obstacle `index` one cell; returns whether it moved.
///
/// The target must be free of everything and keep both axis offsets from the
/// anchor strictly inside `radius`.
pub fn drift_obstacle(
    entities: &mut Entities,
    index: usize,
    direction: Direction,
    radius: i32,
) -> bool {
    let obstacle = entities.obstacles()[index];
    let to = obstacle.position.moved_in_direction(direction);
    let near_anchor =
        (to.x - obstacle.anchor.x).abs() < radius && (to.y - obstacle.anchor.y).abs() < radius;

    if near_anchor && entities.is_free(to) {
        entities.move_obstacle(index, to);
        true
    } else {
        false
    }
}

fn set_tick_rate(session: &mut Session, rate: u32, result: &mut StepResult) {
    if session.tick_rate != rate {
        session.tick_rate = rate;
        result.events.push(GameEvent::TickRateChanged(rate));
    }
}

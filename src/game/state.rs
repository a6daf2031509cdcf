use super::action::Direction;
use super::entities::{Entities, Food, Obstacle, PlayerSnake, Rival};
use super::grid::Position;

/// What the player snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit itself
    SelfCollision,
    /// Snake hit an obstacle
    Obstacle,
    /// Snake hit a rival's body
    Rival,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost(CollisionType),
}

/// Lifecycle of the player's run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Level laid out, waiting for start
    Ready,
    Running,
    Paused,
    Ended(Outcome),
}

/// Scalar session state mutated by the simulation step
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub score: u32,
    pub level: u32,
    /// Score needed to finish the current level (or win a single-level run)
    pub target_score: u32,
    /// Last milestone announced this level
    pub last_milestone: u32,
    pub status: Status,
    /// Player ticks per second
    pub tick_rate: u32,
    /// Ticks since obstacles last tried to drift
    pub obstacle_timer: u32,
    /// Ticks since rivals were last updated
    pub rival_timer: u32,
    /// Ticks simulated since the level was laid out
    pub ticks: u64,
}

impl Session {
    pub fn new(level: u32, target_score: u32, tick_rate: u32) -> Self {
        Self {
            score: 0,
            level,
            target_score,
            last_milestone: 0,
            status: Status::Ready,
            tick_rate,
            obstacle_timer: 0,
            rival_timer: 0,
            ticks: 0,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub session: Session,
    pub entities: Entities,
}

impl GameState {
    pub fn new(session: Session, entities: Entities) -> Self {
        Self { session, entities }
    }

    pub fn is_running(&self) -> bool {
        self.session.status == Status::Running
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.session.status, Status::Ended(_))
    }

    /// Buffer a heading change for the next tick.
    ///
    /// Only accepted while running, and never a reversal of the current heading.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        let player = self.entities.player_mut();
        if player.direction.is_opposite(direction) {
            return false;
        }
        player.next_direction = direction;
        true
    }

    /// Pause a running game or resume a paused one
    pub fn toggle_pause(&mut self) -> Status {
        self.session.status = match self.session.status {
            Status::Running => Status::Paused,
            Status::Paused => Status::Running,
            other => other,
        };
        self.session.status
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid_size: self.entities.size(),
            player: self.entities.player(),
            rivals: self.entities.rivals(),
            obstacles: self.entities.obstacles(),
            foods: self.entities.foods(),
            big_food: self.entities.big_food(),
            slow_food: self.entities.slow_food(),
            score: self.session.score,
            level: self.session.level,
            target_score: self.session.target_score,
            tick_rate: self.session.tick_rate,
            status: self.session.status,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid_size: i32,
    pub player: &'a PlayerSnake,
    pub rivals: &'a [Rival],
    pub obstacles: &'a [Obstacle],
    pub foods: &'a [Food],
    pub big_food: Option<Position>,
    pub slow_food: Option<Position>,
    pub score: u32,
    pub level: u32,
    pub target_score: u32,
    pub tick_rate: u32,
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let player = PlayerSnake::new(Position::new(10, 10), Direction::Right, 3);
        GameState::new(Session::new(1, 100, 4), Entities::new(20, player))
    }

    #[test]
    fn test_direction_requests_need_running_game() {
        let mut state = state();
        assert!(!state.request_direction(Direction::Up));

        state.session.status = Status::Running;
        assert!(state.request_direction(Direction::Up));
        assert_eq!(state.entities.player().next_direction, Direction::Up);
    }

    #[test]
    fn test_reversal_checked_against_current_heading() {
        let mut state = state();
        state.session.status = Status::Running;

        assert!(!state.request_direction(Direction::Left));
        // Buffered Up does not unlock Left before it is committed
        assert!(state.request_direction(Direction::Up));
        assert!(!state.request_direction(Direction::Left));
        assert_eq!(state.entities.player().next_direction, Direction::Up);
    }

    #[test]
    fn test_toggle_pause() {
        let mut state = state();
        assert_eq!(state.toggle_pause(), Status::Ready);

        state.session.status = Status::Running;
        assert_eq!(state.toggle_pause(), Status::Paused);
        assert!(!state.request_direction(Direction::Up));
        assert_eq!(state.toggle_pause(), Status::Running);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = state();
        state.entities.add_food(Position::new(1, 2), 10);
        state.session.score = 40;

        let snapshot = state.snapshot();
        assert_eq!(snapshot.grid_size, 20);
        assert_eq!(snapshot.player.head(), Position::new(10, 10));
        assert_eq!(snapshot.foods.len(), 1);
        assert_eq!(snapshot.score, 40);
        assert_eq!(snapshot.status, Status::Ready);
    }
}

//! Interactive console game: a human plays one side against a policy.
//!
//! Each human turn prints the board with the legal moves highlighted and
//! reads one line:
//!
//! - `3d` / `d3` - place a stone (row digit 1-8, column letter a-h, any order or case)
//! - `q` - quit the session
//!
//! Blank lines, malformed coordinates and cells that are not legal moves are
//! reported and the prompt repeats. A side without legal moves passes
//! automatically, and the game ends when both sides pass in succession.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

use crate::board::{Move, Side};
use crate::engine::Game;
use crate::error;
use crate::policy::PolicyKind;
use crate::trainer::TrialOutcome;
use crate::weights::NormalizedWeights;

/// One parsed line of human input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Blank,
    Place(Move),
}

/// Parse a line typed at the move prompt.
pub fn parse_input(line: &str) -> error::Result<Input> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Blank);
    }
    if line.eq_ignore_ascii_case("q") {
        return Ok(Input::Quit);
    }
    line.parse().map(Input::Place)
}

/// How a console session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Finished(TrialOutcome),
    Quit,
}

/// Console game state.
pub struct ConsoleGame {
    game: Game,
    human: Side,
    computer_policy: PolicyKind,
    weights: NormalizedWeights,
    rng: fastrand::Rng,
}

impl ConsoleGame {
    /// A new game with the human playing `human`.
    pub fn new(
        human: Side,
        computer_policy: PolicyKind,
        weights: NormalizedWeights,
        rng: fastrand::Rng,
    ) -> Self {
        Self::from_game(Game::new(), human, computer_policy, weights, rng)
    }

    /// Continue an existing game, e.g. one set up from a board diagram.
    pub fn from_game(
        game: Game,
        human: Side,
        computer_policy: PolicyKind,
        weights: NormalizedWeights,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            game,
            human,
            computer_policy,
            weights,
            rng,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the session, reading moves from `input` and writing to `output`.
    ///
    /// End of input is treated like `q`.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<SessionEnd> {
        while !self.game.is_over() {
            let side = self.game.to_move();
            let moves = self.game.legal_moves();

            if moves.is_empty() {
                writeln!(output, "{side} has no legal move and passes.")?;
                self.game.pass();
                continue;
            }

            if side != self.human {
                self.computer_turn(&moves, &mut output)?;
                continue;
            }

            write!(output, "\n{}", self.game.board().render(&moves))?;
            let listed: Vec<String> = moves.iter().map(Move::to_string).collect();
            writeln!(output, "{side} to move: {}", listed.join(" "))?;
            write!(output, "> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line).context("Failed to read move")? == 0 {
                return Ok(SessionEnd::Quit);
            }

            match parse_input(&line) {
                Ok(Input::Quit) => return Ok(SessionEnd::Quit),
                Ok(Input::Blank) => {}
                Ok(Input::Place(mv)) if moves.contains(&mv) => {
                    if !self.game.play(mv) {
                        bail!("legal move {mv} was rejected");
                    }
                }
                Ok(Input::Place(mv)) => writeln!(output, "{mv} is not a legal move.")?,
                Err(e) => writeln!(output, "{e}")?,
            }
        }

        let result = TrialOutcome::of(&self.game);
        write!(output, "\n{}", self.game.board())?;
        match result.outcome.winner() {
            Some(side) => writeln!(output, "{side} Win. ({} - {})", result.black, result.white)?,
            None => writeln!(output, "Draw. ({} - {})", result.black, result.white)?,
        }
        Ok(SessionEnd::Finished(result))
    }

    fn computer_turn<W: Write>(&mut self, moves: &[Move], output: &mut W) -> Result<()> {
        let side = self.game.to_move();
        let Some(mv) = self
            .computer_policy
            .select(moves, &self.weights, &mut self.rng)
        else {
            bail!("policy returned no move from {} candidates", moves.len());
        };
        if !self.game.play(mv) {
            bail!("legal move {mv} was rejected");
        }
        writeln!(output, "{side} plays {mv}")?;
        Ok(())
    }
}

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::error::CalcError;

/// Rating progression calculator.
///
/// Built once from the ladder parameters; every query afterwards is a pure
/// function of `total_mmr_needed` and its own argument.
///
/// `loss_mmr` is a signed term that gets added directly, so a loss that costs
/// 15 rating points must be passed as `-15.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculator {
    mmr_per_division: f64,
    current_mmr: f64,
    divisions: u32,
    win_mmr: f64,
    loss_mmr: f64,
    total_mmr_needed: f64,
}

/// Win rate needed to finish the climb within `total_games`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WinRateReport {
    pub total_games: u64,
    /// Fraction in `(-inf, 1.0]`. Negative means the target is already met.
    pub win_rate: f64,
}

/// Games needed to finish the climb at `win_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GamesReport {
    pub divisions: u32,
    pub win_rate: f64,
    pub games_required: f64,
}

impl Calculator {
    pub fn new(
        mmr_per_division: f64,
        current_mmr: f64,
        divisions: u32,
        win_mmr: f64,
        loss_mmr: f64,
    ) -> Self {
        let total_mmr_needed = f64::from(divisions) * mmr_per_division - current_mmr;

        info!("MMR GAME CALCULATOR IS NOW RUNNING.");
        debug!(
            mmr_per_division,
            current_mmr, divisions, win_mmr, loss_mmr, total_mmr_needed, "calculator ready"
        );

        Self {
            mmr_per_division,
            current_mmr,
            divisions,
            win_mmr,
            loss_mmr,
            total_mmr_needed,
        }
    }

    pub fn mmr_per_division(&self) -> f64 {
        self.mmr_per_division
    }

    pub fn current_mmr(&self) -> f64 {
        self.current_mmr
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    pub fn win_mmr(&self) -> f64 {
        self.win_mmr
    }

    pub fn loss_mmr(&self) -> f64 {
        self.loss_mmr
    }

    /// Net rating still required to reach the target division.
    pub fn total_mmr_needed(&self) -> f64 {
        self.total_mmr_needed
    }

    /// Win rate required to reach the target within `total_games` games.
    ///
    /// `total_games` is taken as `f64` so that callers holding an untyped
    /// number get a proper error for fractional input instead of a silent
    /// truncation.
    ///
    /// # Errors
    ///
    /// - [`CalcError::InvalidArgument`] if `total_games` is not a whole
    ///   number, is below one, does not fit in a `u64`, or if
    ///   `win_mmr == loss_mmr`.
    /// - [`CalcError::InsufficientGames`] if the required rate exceeds 100%.
    pub fn required_win_rate(&self, total_games: f64) -> Result<WinRateReport, CalcError> {
        if !total_games.is_finite() || total_games.fract() != 0.0 {
            return Err(CalcError::invalid(format!(
                "total_games must be a whole number, {} was given instead",
                total_games
            )));
        }
        if total_games < 1.0 {
            return Err(CalcError::invalid(format!(
                "total_games must be at least 1, {} was given instead",
                total_games
            )));
        }

        // 2^64 and above cannot be represented as a game count
        if total_games >= u64::MAX as f64 {
            return Err(CalcError::invalid(format!(
                "total_games must be below {}, {} was given instead",
                u64::MAX,
                total_games
            )));
        }

        let spread = self.win_mmr - self.loss_mmr;
        if spread == 0.0 {
            return Err(CalcError::invalid(format!(
                "win_mmr and loss_mmr are both {}, win rate has no effect on the climb",
                self.win_mmr
            )));
        }

        let win_rate = (self.total_mmr_needed / total_games - self.loss_mmr) / spread;
        if !win_rate.is_finite() {
            return Err(CalcError::invalid(format!(
                "win rate for {} games is not a finite number",
                total_games
            )));
        }

        // Whole, positive and in range was checked above
        let total_games = total_games as u64;
        if win_rate > 1.0 {
            return Err(CalcError::InsufficientGames { total_games });
        }

        debug!(total_games, win_rate, "computed required win rate");
        Ok(WinRateReport {
            total_games,
            win_rate,
        })
    }

    /// Games required to reach the target at `win_rate`.
    ///
    /// # Errors
    ///
    /// [`CalcError::InvalidArgument`] if `win_rate` is not a number in
    /// `[0.0, 1.0]`, or if the expected rating change per game is exactly zero.
    pub fn required_games(&self, win_rate: f64) -> Result<GamesReport, CalcError> {
        if win_rate.is_nan() {
            return Err(CalcError::invalid("winrate must be a number, NaN was given instead"));
        }
        if !(0.0..=1.0).contains(&win_rate) {
            return Err(CalcError::invalid(format!(
                "winrate can only be of values between 0.0 to 1.0. winrate is currently set at {}",
                win_rate
            )));
        }

        let expected_delta = win_rate * self.win_mmr + (1.0 - win_rate) * self.loss_mmr;
        if expected_delta == 0.0 {
            return Err(CalcError::invalid(format!(
                "expected rating change per game is zero at winrate {}, the target is never reached",
                win_rate
            )));
        }

        let games_required = self.total_mmr_needed / expected_delta;
        if !games_required.is_finite() {
            return Err(CalcError::invalid(format!(
                "games required at winrate {} is not a finite number",
                win_rate
            )));
        }

        debug!(win_rate, expected_delta, games_required, "computed required games");
        Ok(GamesReport {
            divisions: self.divisions,
            win_rate,
            games_required,
        })
    }
}

impl WinRateReport {
    /// Required win rate as a percentage.
    pub fn percent(&self) -> f64 {
        self.win_rate * 100.0
    }
}

impl fmt::Display for WinRateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WINRATE REQUIRED IS: {:.1}%", self.percent())
    }
}

impl fmt::Display for GamesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GAMES REQUIRED TO CLIMB {} DIVISIONS IS: {:.1}",
            self.divisions, self.games_required
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn sample() -> Calculator {
        Calculator::new(100.0, 250.0, 5, 20.0, -15.0)
    }

    #[test]
    fn test_total_mmr_needed() {
        assert_eq!(sample().total_mmr_needed(), 250.0);

        let calc = Calculator::new(87.5, 1200.0, 20, 25.0, -25.0);
        assert!((calc.total_mmr_needed() - (20.0 * 87.5 - 1200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_accessors_keep_inputs() {
        let calc = sample();
        assert_eq!(calc.mmr_per_division(), 100.0);
        assert_eq!(calc.current_mmr(), 250.0);
        assert_eq!(calc.divisions(), 5);
        assert_eq!(calc.win_mmr(), 20.0);
        assert_eq!(calc.loss_mmr(), -15.0);
    }

    #[test]
    fn test_required_games_scenario() {
        let report = sample().required_games(0.6).unwrap();
        assert!((report.games_required - 250.0 / 6.0).abs() < 1e-9);
        assert_eq!(report.divisions, 5);
        assert_eq!(
            report.to_string(),
            "GAMES REQUIRED TO CLIMB 5 DIVISIONS IS: 41.7"
        );
    }

    #[test]
    fn test_required_win_rate_insufficient_games() {
        let err = sample().required_win_rate(10.0).unwrap_err();
        assert_eq!(err, CalcError::InsufficientGames { total_games: 10 });
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_required_win_rate_success() {
        // (250/50 + 15) / 35 = 20/35
        let report = sample().required_win_rate(50.0).unwrap();
        assert_eq!(report.total_games, 50);
        assert!((report.win_rate - 20.0 / 35.0).abs() < 1e-9);
        assert_eq!(report.to_string(), "WINRATE REQUIRED IS: 57.1%");
    }

    #[test]
    fn test_required_win_rate_exactly_one_is_allowed() {
        // 200 needed over 10 games is +20 per game, exactly one win each
        let calc = Calculator::new(100.0, 0.0, 2, 20.0, -20.0);
        let report = calc.required_win_rate(10.0).unwrap();
        assert_eq!(report.win_rate, 1.0);
        assert_eq!(report.to_string(), "WINRATE REQUIRED IS: 100.0%");
    }

    #[test]
    fn test_required_win_rate_negative_when_target_met() {
        let calc = Calculator::new(100.0, 900.0, 5, 20.0, -15.0);
        let report = calc.required_win_rate(10.0).unwrap();
        assert!(report.win_rate < 0.0);
        assert!(report.to_string().starts_with("WINRATE REQUIRED IS: -"));
    }

    #[test]
    fn test_required_win_rate_rejects_fractional_games() {
        let err = sample().required_win_rate(10.5).unwrap_err();
        match err {
            CalcError::InvalidArgument(msg) => assert!(msg.contains("10.5")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_required_win_rate_rejects_zero_and_negative_games() {
        assert!(matches!(
            sample().required_win_rate(0.0),
            Err(CalcError::InvalidArgument(_))
        ));
        assert!(matches!(
            sample().required_win_rate(-5.0),
            Err(CalcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_required_win_rate_rejects_non_finite_games() {
        assert!(matches!(
            sample().required_win_rate(f64::NAN),
            Err(CalcError::InvalidArgument(_))
        ));
        assert!(matches!(
            sample().required_win_rate(f64::INFINITY),
            Err(CalcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_required_win_rate_rejects_counts_beyond_u64() {
        for calc in [sample(), Calculator::new(1e30, 0.0, 1, 20.0, -15.0)] {
            match calc.required_win_rate(1e20).unwrap_err() {
                CalcError::InvalidArgument(msg) => {
                    assert!(msg.contains("100000000000000000000"), "{}", msg)
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
        assert!(matches!(
            sample().required_win_rate(u64::MAX as f64),
            Err(CalcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_required_win_rate_keeps_large_counts_exact() {
        let report = sample().required_win_rate(1e15).unwrap();
        assert_eq!(report.total_games, 1_000_000_000_000_000);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_new_logs_ready_notice() {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, sample);

        let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let line = logged
            .lines()
            .find(|l| l.contains("MMR GAME CALCULATOR IS NOW RUNNING."))
            .unwrap_or_else(|| panic!("ready notice missing from {:?}", logged));
        assert!(line.contains("INFO"));
    }

    #[test]
    fn test_required_win_rate_rejects_equal_win_and_loss() {
        let calc = Calculator::new(100.0, 250.0, 5, 10.0, 10.0);
        assert!(matches!(
            calc.required_win_rate(100.0),
            Err(CalcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_required_games_rejects_out_of_range() {
        for rate in [-0.1, 1.1] {
            match sample().required_games(rate).unwrap_err() {
                CalcError::InvalidArgument(msg) => assert!(msg.contains(&rate.to_string())),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_required_games_rejects_nan() {
        assert!(matches!(
            sample().required_games(f64::NAN),
            Err(CalcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_required_games_accepts_bounds() {
        let calc = sample();
        let all_wins = calc.required_games(1.0).unwrap();
        assert!((all_wins.games_required - 12.5).abs() < 1e-9);

        // Losing every game moves away from the target: reported as negative
        let all_losses = calc.required_games(0.0).unwrap();
        assert!(all_losses.games_required < 0.0);
    }

    #[test]
    fn test_required_games_rejects_zero_expected_delta() {
        // 0.5 * 10 + 0.5 * -10 == 0
        let calc = Calculator::new(100.0, 250.0, 5, 10.0, -10.0);
        assert!(matches!(
            calc.required_games(0.5),
            Err(CalcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_queries_are_inverse() {
        let calc = sample();
        for games in [13.0, 20.0, 41.0, 50.0, 100.0, 1000.0] {
            let rate = calc.required_win_rate(games).unwrap();
            let back = calc.required_games(rate.win_rate).unwrap();
            assert!(
                (back.games_required - games).abs() < 1e-6,
                "{} games -> {} -> {}",
                games,
                rate.win_rate,
                back.games_required
            );
        }
    }

    #[test]
    fn test_queries_do_not_depend_on_each_other() {
        let calc = sample();
        let first = calc.required_games(0.6).unwrap();
        let _ = calc.required_win_rate(10.0);
        let _ = calc.required_win_rate(100.0);
        assert_eq!(calc.required_games(0.6).unwrap(), first);
        assert_eq!(calc.total_mmr_needed(), 250.0);
    }

    #[test]
    fn test_calculator_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<Calculator>();

        let calc = sample();
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || calc.required_games(0.6).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().divisions, 5);
        }
    }
}

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use colored::*;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Runs the listed steps in order against one context. The first failing step ends the suite.
#[macro_export]
macro_rules! execute_suite {
    ($context:expr, [ $($test_fn:ident),* $(,)? ]) => {{
        let steps: &[&str] = &[$(stringify!($test_fn)),*];
        let mut report = $crate::runner::orchestration_utils::SuiteReport::new(steps.len());
        $(
            report.step(stringify!($test_fn), $test_fn($context)).await?;
        )*
        report.finish();
    }};
}

/// Progress of a running suite.
pub struct SuiteReport {
    total: usize,
    passed: usize,
    slowest: Option<(&'static str, Duration)>,
    started: Instant,
}

impl SuiteReport {
    #[must_use]
    pub fn new(total: usize) -> Self {
        println!();
        Self {
            total,
            passed: 0,
            slowest: None,
            started: Instant::now(),
        }
    }

    fn counter(&self) -> String {
        let width = self.total.to_string().len();
        format!("[{:>width$}/{}]", self.passed + 1, self.total)
    }

    /// Awaits one step. A failure comes back with the step name and position attached.
    pub async fn step<Fut>(&mut self, name: &'static str, test: Fut) -> Result<()>
    where
        Fut: Future<Output = Result<()>>,
    {
        let counter = self.counter();
        let step_start = Instant::now();
        let result = test.await;
        let elapsed = step_start.elapsed();

        if let Err(e) = result {
            let skipped = self.total - self.passed - 1;
            println!(
                "{} {} {} ({elapsed:.2?})",
                " FAIL ".on_red().black().bold(),
                counter.dimmed(),
                name.red().bold()
            );
            println!("{e:?}");
            println!(
                "{}",
                format!("{} passed before this step, {skipped} not run.", self.passed).yellow()
            );
            return Err(e).wrap_err_with(|| format!("step {counter} `{name}` failed"));
        }

        println!(
            "{} {} {} ({elapsed:.2?})",
            " ok ".on_green().black().bold(),
            counter.dimmed(),
            name.green()
        );
        self.passed += 1;
        if self.slowest.is_none_or(|(_, slowest)| elapsed > slowest) {
            self.slowest = Some((name, elapsed));
        }
        Ok(())
    }

    pub fn finish(self) {
        println!("{}", "─".repeat(60).truecolor(80, 80, 80));
        println!(
            "{} {}/{} steps in {:.2?}",
            " DONE ".on_purple().black().bold(),
            self.passed,
            self.total,
            self.started.elapsed()
        );
        if let Some((name, elapsed)) = self.slowest {
            println!("slowest: {} ({elapsed:.2?})", name.cyan());
        }
        println!();
    }
}

/// Installs a compact subscriber and color-eyre. Later calls are no-ops.
pub fn setup_tracing_and_panic_handling() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "info,sqlx=warn,api=debug,common_services=debug,hyper=error,reqwest=error".into()
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .try_init();

    let _ = color_eyre::install();
}

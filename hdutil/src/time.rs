use std::time::Instant;

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

struct TimerSpan {
    name: String,
    started_at: Instant,
    nested_time: f64,
}

/// Hierarchial timing of the phases of some long-running work. Every span is logged when it
/// starts and stops; notes and warnings are repeated in a summary when the timer is dropped.
pub struct Timer {
    results: Vec<String>,
    stack: Vec<TimerSpan>,

    outermost_name: String,

    notes: Vec<String>,
    warnings: Vec<String>,
}

impl Timer {
    pub fn new<S: Into<String>>(name: S) -> Timer {
        let name = name.into();
        let mut t = Timer {
            results: Vec::new(),
            stack: Vec::new(),
            outermost_name: name.clone(),
            notes: Vec::new(),
            warnings: Vec::new(),
        };
        t.start(name);
        t
    }

    // TODO Shouldn't use this much.
    pub fn throwaway() -> Timer {
        Timer::new("throwaway")
    }

    /// Log immediately, but also repeat at the end, to avoid having to scroll up and find
    /// interesting debug stuff.
    pub fn note<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        info!("{}", line);
        self.notes.push(line);
    }

    pub fn warn<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        warn!("{}", line);
        self.warnings.push(line);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn start<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        debug!("{}...", name);
        self.stack.push(TimerSpan {
            name,
            started_at: Instant::now(),
            nested_time: 0.0,
        });
    }

    pub fn stop<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        let span = match self.stack.pop() {
            Some(span) => span,
            None => {
                error!("Timer stopped {} with nothing started", name);
                return;
            }
        };
        if span.name != name {
            error!("Timer stopped {} while {} was running", name, span.name);
        }
        let elapsed = elapsed_seconds(span.started_at);
        let line = format!("{} took {}", span.name, prettyprint_time(elapsed));

        let padding = "  ".repeat(self.stack.len());
        if let Some(parent) = self.stack.last_mut() {
            parent.nested_time += elapsed;
        }
        if span.nested_time != 0.0 {
            self.results.push(format!(
                "{}  - ... plus {}",
                padding,
                prettyprint_time(elapsed - span.nested_time)
            ));
        }
        self.results.push(format!("{}- {}", padding, line));
        info!("{}", line);
    }
}

impl std::ops::Drop for Timer {
    fn drop(&mut self) {
        let stop_name = self.outermost_name.clone();
        while self.stack.len() > 1 {
            let name = self.stack[self.stack.len() - 1].name.clone();
            self.stop(name);
        }
        if !self.stack.is_empty() {
            self.stop(stop_name);
        }

        // Spans were pushed innermost-first; print outermost-first.
        for line in self.results.iter().rev() {
            debug!("{}", line);
        }

        if !self.notes.is_empty() {
            info!("{} notes:", self.notes.len());
            for line in &self.notes {
                info!("{}", line);
            }
        }
        if !self.warnings.is_empty() {
            warn!("{} warnings:", self.warnings.len());
            for line in &self.warnings {
                warn!("{}", line);
            }
        }
    }
}

pub fn prettyprint_usize(x: usize) -> String {
    let num = format!("{}", x);
    let mut result = String::new();
    let mut i = num.len();
    for c in num.chars() {
        result.push(c);
        i -= 1;
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
    }
    result
}

pub fn prettyprint_time(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

//! Solver configuration record.
//!
//! This crate does not run the outer SuperSCS iteration itself — that lives
//! in the external collaborator described in the crate's top-level docs —
//! but [`Config`] is the immutable record the kernels here are parameterized
//! by (`rho_x` feeds [`crate::proj::proj_lin_sys`], `cg_rate`/`eps` shape the
//! tolerance an outer loop would pass into [`crate::leastsquares::cgls`]).

/// Acceleration direction family for the quasi-Newton step of the
/// accelerated (SuperSCS) iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    RestartedBroyden,
    FullBroyden,
    AndersonAcceleration,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::RestartedBroyden
    }
}

/// Immutable, per-solve configuration. Build with [`Config::default`] or
/// [`ConfigBuilder`]; there is no mutation once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub max_iters: u32,
    pub eps: f64,
    pub alpha: f64,
    pub rho_x: f64,
    pub scale: f64,
    pub cg_rate: f64,
    pub verbose: bool,
    pub normalize: bool,
    pub warm_start: bool,
    pub do_super_scs: bool,
    pub k0: u32,
    pub k1: u32,
    pub k2: u32,
    pub c_bl: f64,
    pub c1: f64,
    pub sse: f64,
    pub ls: u32,
    pub beta: f64,
    pub sigma: f64,
    pub memory: u32,
    pub direction: Direction,
    pub broyden_iscale: u32,
    pub thetabar: f64,
    pub delta: f64,
    pub alpha_c: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_iters: 2500,
            eps: 1e-3,
            alpha: 1.5,
            rho_x: 1e-3,
            scale: 1.0,
            cg_rate: 2.0,
            verbose: true,
            normalize: true,
            warm_start: false,
            do_super_scs: true,
            k0: 0,
            k1: 1,
            k2: 1,
            c_bl: 0.999,
            c1: 1.0 - 1e-4,
            sse: 1.0 - 1e-3,
            ls: 10,
            beta: 0.5,
            sigma: 1e-2,
            memory: 10,
            direction: Direction::RestartedBroyden,
            broyden_iscale: 1,
            thetabar: 0.1,
            delta: 0.5,
            alpha_c: 1e-2,
        }
    }
}

/// Fluent builder over [`Config`], starting from the documented defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder { config: Config::default() }
    }

    pub fn max_iters(mut self, v: u32) -> Self {
        self.config.max_iters = v;
        self
    }

    pub fn eps(mut self, v: f64) -> Self {
        self.config.eps = v;
        self
    }

    pub fn alpha(mut self, v: f64) -> Self {
        self.config.alpha = v;
        self
    }

    pub fn rho_x(mut self, v: f64) -> Self {
        self.config.rho_x = v;
        self
    }

    pub fn scale(mut self, v: f64) -> Self {
        self.config.scale = v;
        self
    }

    pub fn cg_rate(mut self, v: f64) -> Self {
        self.config.cg_rate = v;
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.config.verbose = v;
        self
    }

    pub fn normalize(mut self, v: bool) -> Self {
        self.config.normalize = v;
        self
    }

    pub fn warm_start(mut self, v: bool) -> Self {
        self.config.warm_start = v;
        self
    }

    pub fn do_super_scs(mut self, v: bool) -> Self {
        self.config.do_super_scs = v;
        self
    }

    pub fn direction(mut self, v: Direction) -> Self {
        self.config.direction = v;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! Field tables for the SuperDARN formats.

use crate::types::Type::{self, *};

pub(super) const IQDAT: &[(&str, Type)] = &[
    ("radar.revision.major", Char),
    ("radar.revision.minor", Char),
    ("origin.code", Char),
    ("origin.time", String),
    ("origin.command", String),
    ("cp", Short),
    ("stid", Short),
    ("time.yr", Short),
    ("time.mo", Short),
    ("time.dy", Short),
    ("time.hr", Short),
    ("time.mt", Short),
    ("time.sc", Short),
    ("time.us", Int),
    ("txpow", Short),
    ("nave", Short),
    ("atten", Short),
    ("lagfr", Short),
    ("smsep", Short),
    ("ercod", Short),
    ("stat.agc", Short),
    ("stat.lopwr", Short),
    ("noise.search", Float),
    ("noise.mean", Float),
    ("channel", Short),
    ("bmnum", Short),
    ("bmazm", Float),
    ("scan", Short),
    ("offset", Short),
    ("rxrise", Short),
    ("intt.sc", Short),
    ("intt.us", Int),
    ("txpl", Short),
    ("mpinc", Short),
    ("mppul", Short),
    ("mplgs", Short),
    ("nrang", Short),
    ("frang", Short),
    ("rsep", Short),
    ("xcf", Short),
    ("tfreq", Short),
    ("mxpwr", Int),
    ("lvmax", Int),
    ("iqdata.revision.major", Int),
    ("iqdata.revision.minor", Int),
    ("combf", String),
    ("seqnum", Int),
    ("chnnum", Int),
    ("smpnum", Int),
    ("skpnum", Int),
    ("ptab", Short),
    ("ltab", Short),
    ("tsc", Int),
    ("tus", Int),
    ("tatten", Short),
    ("tnoise", Float),
    ("toff", Int),
    ("tsze", Int),
    ("data", Short),
];

pub(super) const RAWACF: &[(&str, Type)] = &[
    ("radar.revision.major", Char),
    ("radar.revision.minor", Char),
    ("origin.code", Char),
    ("origin.time", String),
    ("origin.command", String),
    ("cp", Short),
    ("stid", Short),
    ("time.yr", Short),
    ("time.mo", Short),
    ("time.dy", Short),
    ("time.hr", Short),
    ("time.mt", Short),
    ("time.sc", Short),
    ("time.us", Int),
    ("txpow", Short),
    ("nave", Short),
    ("atten", Short),
    ("lagfr", Short),
    ("smsep", Short),
    ("ercod", Short),
    ("stat.agc", Short),
    ("stat.lopwr", Short),
    ("noise.search", Float),
    ("noise.mean", Float),
    ("channel", Short),
    ("bmnum", Short),
    ("bmazm", Float),
    ("scan", Short),
    ("offset", Short),
    ("rxrise", Short),
    ("intt.sc", Short),
    ("intt.us", Int),
    ("txpl", Short),
    ("mpinc", Short),
    ("mppul", Short),
    ("mplgs", Short),
    ("nrang", Short),
    ("frang", Short),
    ("rsep", Short),
    ("xcf", Short),
    ("tfreq", Short),
    ("mxpwr", Int),
    ("lvmax", Int),
    ("rawacf.revision.major", Int),
    ("rawacf.revision.minor", Int),
    ("combf", String),
    ("thr", Float),
    ("ptab", Short),
    ("ltab", Short),
    ("slist", Short),
    ("pwr0", Float),
];

pub(super) const RAWACF_CORRELATION: &[(&str, Type)] = &[("acfd", Float)];

pub(super) const RAWACF_DIGITIZING: &[(&str, Type)] = &[("ifmode", Short)];

pub(super) const RAWACF_FITTEX: &[(&str, Type)] = &[("mplgexs", Short)];

pub(super) const RAWACF_CROSS_CORRELATION: &[(&str, Type)] = &[("xcfd", Float)];

pub(super) const FITACF: &[(&str, Type)] = &[
    ("radar.revision.major", Char),
    ("radar.revision.minor", Char),
    ("origin.code", Char),
    ("origin.time", String),
    ("origin.command", String),
    ("cp", Short),
    ("stid", Short),
    ("time.yr", Short),
    ("time.mo", Short),
    ("time.dy", Short),
    ("time.hr", Short),
    ("time.mt", Short),
    ("time.sc", Short),
    ("time.us", Int),
    ("txpow", Short),
    ("nave", Short),
    ("atten", Short),
    ("lagfr", Short),
    ("smsep", Short),
    ("ercod", Short),
    ("stat.agc", Short),
    ("stat.lopwr", Short),
    ("noise.search", Float),
    ("noise.mean", Float),
    ("channel", Short),
    ("bmnum", Short),
    ("bmazm", Float),
    ("scan", Short),
    ("offset", Short),
    ("rxrise", Short),
    ("intt.sc", Short),
    ("intt.us", Int),
    ("txpl", Short),
    ("mpinc", Short),
    ("mppul", Short),
    ("mplgs", Short),
    ("nrang", Short),
    ("frang", Short),
    ("rsep", Short),
    ("xcf", Short),
    ("tfreq", Short),
    ("mxpwr", Int),
    ("lvmax", Int),
    ("combf", String),
    ("fitacf.revision.major", Int),
    ("fitacf.revision.minor", Int),
    ("noise.sky", Float),
    ("noise.lag0", Float),
    ("noise.vel", Float),
    ("ptab", Short),
    ("ltab", Short),
    ("pwr0", Float),
];

pub(super) const FITACF_EXTRA: &[(&str, Type)] = &[
    ("ifmode", Short),
    ("mplgexs", Short),
];

pub(super) const FITACF_FITTED: &[(&str, Type)] = &[
    ("slist", Short),
    ("nlag", Short),
    ("qflg", Char),
    ("gflg", Char),
    ("p_l", Float),
    ("p_l_e", Float),
    ("p_s", Float),
    ("p_s_e", Float),
    ("v", Float),
    ("v_e", Float),
    ("w_l", Float),
    ("w_l_e", Float),
    ("w_s", Float),
    ("w_s_e", Float),
    ("sd_l", Float),
    ("sd_s", Float),
    ("sd_phi", Float),
];

pub(super) const FITACF_ELEVATION: &[(&str, Type)] = &[
    ("x_qflg", Char),
    ("x_gflg", Char),
    ("x_p_l", Float),
    ("x_p_l_e", Float),
    ("x_p_s", Float),
    ("x_p_s_e", Float),
    ("x_v", Float),
    ("x_v_e", Float),
    ("x_w_l", Float),
    ("x_w_l_e", Float),
    ("x_w_s", Float),
    ("x_w_s_e", Float),
    ("phi0", Float),
    ("phi0_e", Float),
    ("elv", Float),
    ("elv_low", Float),
    ("elv_high", Float),
    ("x_sd_l", Float),
    ("x_sd_s", Float),
    ("x_sd_phi", Float),
];

pub(super) const GRID: &[(&str, Type)] = &[
    ("start.year", Short),
    ("start.month", Short),
    ("start.day", Short),
    ("start.hour", Short),
    ("start.minute", Short),
    ("start.second", Double),
    ("end.year", Short),
    ("end.month", Short),
    ("end.day", Short),
    ("end.hour", Short),
    ("end.minute", Short),
    ("end.second", Double),
    ("stid", Short),
    ("channel", Short),
    ("nvec", Short),
    ("freq", Float),
    ("major.revision", Short),
    ("minor.revision", Short),
    ("program.id", Short),
    ("noise.mean", Float),
    ("noise.sd", Float),
    ("gsct", Short),
    ("v.min", Float),
    ("v.max", Float),
    ("p.min", Float),
    ("p.max", Float),
    ("w.min", Float),
    ("w.max", Float),
    ("ve.min", Float),
    ("ve.max", Float),
];

pub(super) const GRID_FITTED: &[(&str, Type)] = &[
    ("vector.mlat", Float),
    ("vector.vel.median", Float),
    ("vector.channel", Short),
    ("vector.stid", Short),
    ("vector.vel.sd", Float),
    ("vector.index", Int),
    ("vector.kvect", Float),
    ("vector.mlon", Float),
];

pub(super) const GRID_EXTRA: &[(&str, Type)] = &[
    ("vector.pwr.median", Float),
    ("vector.pwr.sd", Float),
    ("vector.wdt.median", Float),
    ("vector.wdt.sd", Float),
];

pub(super) const MAP: &[(&str, Type)] = &[
    ("start.year", Short),
    ("start.month", Short),
    ("start.day", Short),
    ("start.hour", Short),
    ("start.minute", Short),
    ("start.second", Double),
    ("end.year", Short),
    ("end.month", Short),
    ("end.day", Short),
    ("end.hour", Short),
    ("end.minute", Short),
    ("end.second", Double),
    ("map.major.revision", Short),
    ("map.minor.revision", Short),
    ("doping.level", Short),
    ("model.wt", Short),
    ("error.wt", Short),
    ("IMF.flag", Short),
    ("IMF.delay", Short),
    ("IMF.Bx", Double),
    ("IMF.By", Double),
    ("IMF.Bz", Double),
    ("IMF.Vx", Double),
    ("IMF.tilt", Double),
    ("IMF.Kp", Double),
    ("hemisphere", Short),
    ("noigrf", Short),
    ("fit.order", Short),
    ("latmin", Float),
    ("chi.sqr", Double),
    ("chi.sqr.dat", Double),
    ("rms.err", Double),
    ("lon.shft", Float),
    ("lat.shft", Float),
    ("mlt.start", Double),
    ("mlt.end", Double),
    ("mlt.av", Double),
    ("pot.drop", Double),
    ("pot.drop.err", Double),
    ("pot.max", Double),
    ("pot.max.err", Double),
    ("pot.min", Double),
    ("pot.min.err", Double),
    ("stid", Short),
    ("channel", Short),
    ("nvec", Short),
    ("freq", Float),
    ("major.revision", Short),
    ("minor.revision", Short),
    ("program.id", Short),
    ("noise.mean", Float),
    ("noise.sd", Float),
    ("gsct", Short),
    ("v.min", Float),
    ("v.max", Float),
    ("p.min", Float),
    ("p.max", Float),
    ("w.min", Float),
    ("w.max", Float),
    ("ve.min", Float),
    ("ve.max", Float),
    ("vector.mlat", Float),
    ("vector.mlon", Float),
    ("vector.kvect", Float),
    ("vector.stid", Short),
    ("vector.channel", Short),
    ("vector.index", Int),
    ("vector.vel.median", Float),
    ("vector.vel.sd", Float),
];

pub(super) const MAP_EXTRA: &[(&str, Type)] = &[
    ("vector.pwr.median", Float),
    ("vector.pwr.sd", Float),
    ("vector.wdt.median", Float),
    ("vector.wdt.sd", Float),
];

pub(super) const MAP_FIT: &[(&str, Type)] = &[
    ("source", String),
    ("N", Double),
    ("N+1", Double),
    ("N+2", Double),
    ("N+3", Double),
];

pub(super) const MAP_MODEL: &[(&str, Type)] = &[
    ("model.angle", String),
    ("model.level", String),
    ("model.tilt", String),
    ("model.name", String),
];

pub(super) const MAP_HMB: &[(&str, Type)] = &[
    ("model.mlat", Float),
    ("model.mlon", Float),
    ("model.kvect", Float),
    ("model.vel.median", Float),
    ("boundary.mlat", Float),
    ("boundary.mlon", Float),
];

pub(super) const SND: &[(&str, Type)] = &[
    ("radar.revision.major", Char),
    ("radar.revision.minor", Char),
    ("origin.code", Char),
    ("origin.time", String),
    ("origin.command", String),
    ("cp", Short),
    ("stid", Short),
    ("time.yr", Short),
    ("time.mo", Short),
    ("time.dy", Short),
    ("time.hr", Short),
    ("time.mt", Short),
    ("time.sc", Short),
    ("time.us", Int),
    ("nave", Short),
    ("lagfr", Short),
    ("smsep", Short),
    ("noise.search", Float),
    ("noise.mean", Float),
    ("channel", Short),
    ("bmnum", Short),
    ("bmazm", Float),
    ("scan", Short),
    ("rxrise", Short),
    ("intt.sc", Short),
    ("intt.us", Int),
    ("nrang", Short),
    ("frang", Short),
    ("rsep", Short),
    ("xcf", Short),
    ("tfreq", Short),
    ("noise.sky", Float),
    ("combf", String),
    ("fitacf.revision.major", Int),
    ("fitacf.revision.minor", Int),
    ("snd.revision.major", Short),
    ("snd.revision.minor", Short),
];

pub(super) const SND_FITTED: &[(&str, Type)] = &[
    ("slist", Short),
    ("qflg", Char),
    ("gflg", Char),
    ("v", Float),
    ("v_e", Float),
    ("p_l", Float),
    ("w_l", Float),
    ("x_qflg", Char),
    ("phi0", Float),
    ("phi0_e", Float),
];

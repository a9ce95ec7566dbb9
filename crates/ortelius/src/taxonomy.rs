//! Sort-rank assignment for the `GeoNames` feature taxonomy.
//!
//! Every gazetteer entry carries a two-level classification: a single-letter
//! *feature class* (administrative region, populated place, hydrographic
//! feature, ...) and a finer-grained *feature code* within that class
//! (`PCLI` independent political entity, `PPLC` capital, `ADM1` first-order
//! division, ...). Retrieval orders candidates by these fields before
//! population, so both need a total order.
//!
//! The class set is small and closed; the code set is large and maintained by
//! the upstream data provider, which introduces new codes over time. Codes are
//! therefore ranked through a lookup table over a curated ordered list rather
//! than a closed enumeration: values missing from the table are *unknown*,
//! compare equal to each other, and sort strictly after every known value.

use std::cmp::Ordering;

use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Margin separating the last curated rank from the rank assigned to unknown
/// values. Must exceed the largest possible in-taxonomy rank difference so
/// that "known beats unknown" dominates any comparison between known values;
/// a test asserts this against the curated table sizes.
pub const UNKNOWN_RANK_MARGIN: i64 = 1000;

/// All feature classes present in the `GeoNames` data set, in sort order:
///
/// - `A` country, state, region
/// - `P` city, village
/// - `S` spot, building, farm
/// - `T` mountain, hill, rock
/// - `L` parks, area
/// - `H` stream, lake
/// - `R` road, railroad
/// - `V` forest, heath
/// - `U` undersea
const FEATURE_CLASS_ORDER: &[&str] = &["A", "P", "S", "T", "L", "H", "R", "V", "U"];

/// Curated feature-code order, grouped by originating feature class.
///
/// Within the `A` and `P` groups codes are ordered by typical importance
/// (national entity before first-order division before second-order, capital
/// before plain populated place); the remaining groups carry the provider's
/// published code inventory so that any cataloged code still outranks one the
/// provider invented after this table was written.
///
/// Code inventory: <https://www.geonames.org/export/codes.html>
const FEATURE_CODE_ORDER: &[&str] = &[
    // A country, state, region
    "TERR", "PCLI", "PCLD", "PCLIX", "PCLF", "PCL", "PCLS", "ADM1", "ADMD", "ADM2", "LTER",
    "ADM3", "ADM4", "ADM5", "PRSH", "ZN", "ZNB", "PCLH", "ADM1H", "ADM2H", "ADM3H", "ADM4H",
    "ADMDH",
    // P city, village
    "PPLC", "PPL", "PPLA", "PPLA2", "PPLA3", "PPLA4", "STLMT", "PPLS", "PPLG", "PPLF", "PPLL",
    "PPLR", "PPLX", "PPLW", "PPLCH", "PPLH", "PPLQ",
    // S spot, building, farm
    "ADMF", "AGRF", "AIRB", "AIRF", "AIRH", "AIRP", "AIRQ", "AMTH", "ANS", "AQC", "ARCH",
    "ASTR", "ASYL", "ATHF", "ATM", "BANK", "BCN", "BDG", "BDGQ", "BLDG", "BLDO", "BP", "BRKS",
    "BRKW", "BSTN", "BTYD", "BUR", "BUSTN", "BUSTP", "CARN", "CAVE", "CH", "CMP", "CMPL",
    "CMPLA", "CMPMN", "CMPO", "CMPQ", "CMPRF", "CMTY", "COMC", "CRRL", "CSNO", "CSTL", "CSTM",
    "CTHSE", "CTRA", "CTRCM", "CTRF", "CTRM", "CTRR", "CTRS", "CVNT", "DAM", "DAMQ", "DAMSB",
    "DARY", "DCKD", "DCKY", "DIKE", "DIP", "DPOF", "EST", "ESTO", "ESTR", "ESTSG", "ESTT",
    "ESTX", "FCL", "FNDY", "FRM", "FRMQ", "FRMS", "FRMT", "FT", "FY", "GATE", "GDN", "GHAT",
    "GHSE", "GOSP", "GOVL", "GRVE", "HERM", "HLT", "HMSD", "HSE", "HSEC", "HSP", "HSPC",
    "HSPD", "HSPL", "HSTS", "HTL", "HUT", "HUTS", "INSM", "ITTR", "JTY", "LDNG", "LEPC",
    "LIBR", "LNDF", "LOCK", "LTHSE", "MALL", "MAR", "MFG", "MFGB", "MFGC", "MFGCU", "MFGLM",
    "MFGM", "MFGPH", "MFGQ", "MFGSG", "MKT", "ML", "MLM", "MLO", "MLSG", "MLSGQ", "MLSW",
    "MLWND", "MLWTR", "MN", "MNAU", "MNC", "MNCR", "MNCU", "MNFE", "MNMT", "MNN", "MNQ",
    "MNQR", "MOLE", "MSQE", "MSSN", "MSSNQ", "MSTY", "MTRO", "MUS", "NOV", "NSY", "OBPT",
    "OBS", "OBSR", "OILJ", "OILQ", "OILR", "OILT", "OILW", "OPRA", "PAL", "PGDA", "PIER",
    "PKLT", "PMPO", "PMPW", "PO", "PP", "PPQ", "PRKGT", "PRKHQ", "PRN", "PRNJ", "PRNQ", "PS",
    "PSH", "PSTB", "PSTC", "PSTP", "PYR", "PYRS", "QUAY", "RDCR", "RECG", "RECR", "REST",
    "RET", "RHSE", "RKRY", "RLG", "RLGR", "RNCH", "RSD", "RSGNL", "RSRT", "RSTN", "RSTNQ",
    "RSTP", "RSTPQ", "RUIN", "SCH", "SCHA", "SCHC", "SCHL", "SCHM", "SCHN", "SCHT", "SECP",
    "SHPF", "SHRN", "SHSE", "SLCE", "SNTR", "SPA", "SPLY", "SQR", "STBL", "STDM", "STNB",
    "STNC", "STNE", "STNF", "STNI", "STNM", "STNR", "STNS", "STNW", "STPS", "SWT", "THTR",
    "TMB", "TMPL", "TNKD", "TOWR", "TRANT", "TRIG", "TRMO", "TWO", "UNIP", "UNIV", "USGE",
    "VETF", "WALL", "WALLA", "WEIR", "WHRF", "WRCK", "WTRW", "ZNF", "ZOO",
    // T mountain, hill, rock
    "ASPH", "ATOL", "BAR", "BCH", "BCHS", "BDLD", "BLDR", "BLHL", "BLOW", "BNCH", "BUTE",
    "CAPE", "CFT", "CLDA", "CLF", "CNYN", "CONE", "CRDR", "CRQ", "CRQS", "CRTR", "CUET",
    "DLTA", "DPR", "DSRT", "DUNE", "DVD", "ERG", "FAN", "FORD", "FSR", "GAP", "GRGE", "HDLD",
    "HLL", "HLLS", "HMCK", "HMDA", "INTF", "ISL", "ISLET", "ISLF", "ISLM", "ISLS", "ISLT",
    "ISLX", "ISTH", "KRST", "LAVA", "LEV", "MESA", "MND", "MRN", "MT", "MTS", "NKM", "NTK",
    "NTKS", "PAN", "PANS", "PASS", "PEN", "PENX", "PK", "PKS", "PLAT", "PLATX", "PLDR", "PLN",
    "PLNX", "PROM", "PT", "PTS", "RDGB", "RDGE", "REG", "RK", "RKFL", "RKS", "SAND", "SBED",
    "SCRP", "SDL", "SHOR", "SINK", "SLID", "SLP", "SPIT", "SPUR", "TAL", "TRGD", "TRR",
    "UPLD", "VAL", "VALG", "VALS", "VALX", "VLC",
    // L parks, area
    "AGRC", "AMUS", "AREA", "BSND", "BSNP", "BTL", "CLG", "CMN", "CNS", "COLF", "CONT", "CST",
    "CTRB", "DEVH", "FLD", "FLDI", "GASF", "GRAZ", "GVL", "INDS", "LAND", "LCTY", "MILB",
    "MNA", "MVA", "NVB", "OAS", "OILF", "PEAT", "PRK", "PRT", "QCKS", "RES", "RESA", "RESF",
    "RESH", "RESN", "RESP", "RESV", "RESW", "RGN", "RGNE", "RGNH", "RGNL", "RNGA", "SALT",
    "SNOW", "TRB",
    // H stream, lake
    "AIRS", "ANCH", "BAY", "BAYS", "BGHT", "BNK", "BNKR", "BNKX", "BOG", "CAPG", "CHN",
    "CHNL", "CHNM", "CHNN", "CNFL", "CNL", "CNLA", "CNLB", "CNLD", "CNLI", "CNLN", "CNLQ",
    "CNLSB", "CNLX", "COVE", "CRKT", "CRNT", "CUTF", "DCK", "DCKB", "DOMG", "DPRG", "DTCH",
    "DTCHD", "DTCHI", "DTCHM", "ESTY", "FISH", "FJD", "FJDS", "FLLS", "FLLSX", "FLTM", "FLTT",
    "GLCR", "GULF", "GYSR", "HBR", "HBRX", "INLT", "INLTQ", "LBED", "LGN", "LGNS", "LGNX",
    "LK", "LKC", "LKI", "LKN", "LKNI", "LKO", "LKOI", "LKS", "LKSB", "LKSC", "LKSI", "LKSN",
    "LKSNI", "LKX", "MFGN", "MGV", "MOOR", "MRSH", "MRSHN", "NRWS", "OCN", "OVF", "PND",
    "PNDI", "PNDN", "PNDNI", "PNDS", "PNDSF", "PNDSI", "PNDSN", "POOL", "POOLI", "RCH",
    "RDGG", "RDST", "RF", "RFC", "RFX", "RPDS", "RSV", "RSVI", "RSVT", "RVN", "SBKH", "SD",
    "SEA", "SHOL", "SILL", "SPNG", "SPNS", "SPNT", "STM", "STMA", "STMB", "STMC", "STMD",
    "STMH", "STMI", "STMIX", "STMM", "STMQ", "STMS", "STMSB", "STMX", "STRT", "SWMP", "SYSI",
    "TNLC", "WAD", "WADB", "WADJ", "WADM", "WADS", "WADX", "WHRL", "WLL", "WLLQ", "WLLS",
    "WTLD", "WTLDI", "WTRC", "WTRH",
    // R road, railroad
    "CSWY", "OILP", "PRMN", "PTGE", "RD", "RDA", "RDB", "RDCUT", "RDJCT", "RJCT", "RR", "RRQ",
    "RTE", "RYD", "ST", "STKR", "TNL", "TNLN", "TNLRD", "TNLRR", "TNLS", "TRL",
    // V forest, heath
    "BUSH", "CULT", "FRST", "FRSTF", "GRSLD", "GRVC", "GRVO", "GRVP", "GRVPN", "HTH", "MDW",
    "OCH", "SCRB", "TREE", "TUND", "VIN", "VINS",
    // U undersea
    "APNU", "ARCU", "ARRU", "BDLU", "BKSU", "BNKU", "BSNU", "CDAU", "CNSU", "CNYU", "CRSU",
    "DEPU", "EDGU", "ESCU", "FANU", "FLTU", "FRZU", "FURU", "GAPU", "GLYU", "HLLU", "HLSU",
    "HOLU", "KNLU", "KNSU", "LDGU", "LEVU", "MESU", "MNDU", "MOTU", "MTU", "PKSU", "PKU",
    "PLNU", "PLTU", "PNLU", "PRVU", "RDGU", "RDSU", "RFSU", "RFU", "RISU", "SCNU", "SCSU",
    "SDLU", "SHFU", "SHLU", "SHSU", "SHVU", "SILU", "SLPU", "SMSU", "SMU", "SPRU", "TERU",
    "TMSU", "TMTU", "TNGU", "TRGU", "TRNU", "VALU", "VLSU",
];

static FEATURE_CLASS_RANKS: Lazy<AHashMap<&'static str, i64>> =
    Lazy::new(|| rank_table(FEATURE_CLASS_ORDER));
static FEATURE_CODE_RANKS: Lazy<AHashMap<&'static str, i64>> =
    Lazy::new(|| rank_table(FEATURE_CODE_ORDER));

fn rank_table(order: &'static [&'static str]) -> AHashMap<&'static str, i64> {
    order
        .iter()
        .enumerate()
        .map(|(position, value)| (*value, position as i64))
        .collect()
}

/// The taxonomy field a [`TaxonomyRanker`] was constructed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyField {
    FeatureClass,
    FeatureCode,
}

/// Rank lookup for exactly one taxonomy field.
///
/// A ranker is bound to its field at construction ([`Self::feature_class`] /
/// [`Self::feature_code`]); there is no way to point it at another field, so
/// it can never be invoked with the wrong rank table.
#[derive(Debug, Clone, Copy)]
pub struct TaxonomyRanker {
    field: TaxonomyField,
    ranks: &'static AHashMap<&'static str, i64>,
    unknown_rank: i64,
}

impl TaxonomyRanker {
    /// Ranker over the 9-symbol feature-class order.
    pub fn feature_class() -> Self {
        Self {
            field: TaxonomyField::FeatureClass,
            ranks: Lazy::force(&FEATURE_CLASS_RANKS),
            unknown_rank: FEATURE_CLASS_ORDER.len() as i64 + UNKNOWN_RANK_MARGIN,
        }
    }

    /// Ranker over the curated feature-code order.
    pub fn feature_code() -> Self {
        Self {
            field: TaxonomyField::FeatureCode,
            ranks: Lazy::force(&FEATURE_CODE_RANKS),
            unknown_rank: FEATURE_CODE_ORDER.len() as i64 + UNKNOWN_RANK_MARGIN,
        }
    }

    /// Which field this ranker is bound to.
    #[must_use]
    pub const fn field(&self) -> TaxonomyField {
        self.field
    }

    /// Whether the value appears in the curated order for this field.
    #[must_use]
    pub fn is_known(&self, value: &str) -> bool {
        self.ranks.contains_key(value.trim())
    }

    /// Sort rank for a taxonomy value: the curated position for known values,
    /// a fixed rank [`UNKNOWN_RANK_MARGIN`] past the end of the table for
    /// unknown ones. All unknown values share the same rank, so they compare
    /// equal to each other and strictly after every known value.
    #[must_use]
    pub fn rank(&self, value: &str) -> i64 {
        self.ranks
            .get(value.trim())
            .copied()
            .unwrap_or(self.unknown_rank)
    }

    /// Compare two values of this ranker's field by rank.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }
}

//! Built-in GachiScript vocabulary.
//!
//! Each section lists `(host, substituted)` pairs in the order they are
//! inserted into the table. No substituted form is reused within or across
//! sections, and no substituted form equals a host form.

use super::{Category, Framework, Section};

pub(super) static KEYWORDS: &[(&str, &str)] = &[
    // Declarations
    ("const", "tight"),
    ("let", "loose"),
    ("var", "sloppy"),
    ("function", "performance"),
    ("class", "gymClass"),
    ("extends", "stretches"),
    ("implements", "performs"),
    ("abstract", "imaginary"),
    ("interface", "contract"),
    ("type", "flavor"),
    ("enum", "menu"),
    // Async
    ("async", "steamy"),
    ("await", "anticipate"),
    ("yield", "surrender"),
    ("return", "deliver"),
    // Control flow
    ("if", "whenHard"),
    ("else", "whenSoft"),
    ("switch", "choose"),
    ("case", "position"),
    ("default", "vanilla"),
    ("for", "pump"),
    ("while", "endure"),
    ("do", "perform"),
    ("break", "release"),
    ("continue", "persist"),
    // Operators spelled as words
    ("new", "fresh"),
    ("delete", "destroy"),
    ("typeof", "whatKind"),
    ("instanceof", "isA"),
    ("in", "inside"),
    ("of", "outOf"),
    ("void", "nothing"),
    // Object model
    ("this", "self"),
    ("super", "daddy"),
    ("static", "fixed"),
    ("private", "backstage"),
    ("protected", "guarded"),
    ("public", "onStage"),
    ("readonly", "watchOnly"),
    ("get", "taker"),
    ("set", "giver"),
    // Exceptions
    ("try", "attempt"),
    ("catch", "handle"),
    ("finally", "cleanup"),
    ("throw", "hurl"),
    // Modules
    ("import", "summon"),
    ("export", "share"),
    ("from", "via"),
    ("as", "nicknamed"),
    // Literals
    ("true", "yes"),
    ("false", "no"),
    ("null", "emptyHole"),
    ("undefined", "missing"),
    ("debugger", "spectator"),
];

pub(super) static OPERATORS: &[(&str, &str)] = &[
    ("===", "deeplyMatches"),
    ("!==", "deeplyDiffers"),
    ("==", "looselyMatches"),
    ("!=", "looselyDiffers"),
    ("=", "becomes"),
    ("+=", "addTo"),
    ("-=", "subtractFrom"),
    ("*=", "multiplyBy"),
    ("/=", "divideBy"),
    ("+", "plus"),
    ("-", "minus"),
    ("*", "times"),
    ("/", "dividedBy"),
    ("%", "leftover"),
    ("**", "toThePowerOf"),
    ("++", "pumpUp"),
    ("--", "deflate"),
    ("&&", "and"),
    ("||", "or"),
    ("!", "not"),
    ("??", "orElse"),
    ("<", "smaller"),
    (">", "bigger"),
    ("<=", "smallerOrEqual"),
    (">=", "biggerOrEqual"),
    ("=>", "leadsTo"),
    ("...", "spread"),
    ("?", "maybe"),
    (":", "otherwise"),
    ("&", "bitwiseAnd"),
    ("|", "bitwiseOr"),
    ("^", "bitwiseXor"),
    ("~", "bitwiseNot"),
    ("<<", "leftShift"),
    (">>", "rightShift"),
    (">>>", "unsignedRightShift"),
];

pub(super) static TYPES: &[(&str, &str)] = &[
    ("string", "rope"),
    ("number", "reps"),
    ("boolean", "yesOrNo"),
    ("any", "anything"),
    ("unknown", "mystery"),
    ("never", "impossible"),
    ("object", "thingy"),
    ("symbol", "sigil"),
    ("bigint", "bigReps"),
];

pub(super) static BUILTIN_METHODS: &[(&str, &str)] = &[
    // Arrays
    ("push", "insert"),
    ("pop", "extract"),
    ("shift", "pullOut"),
    ("unshift", "pushIn"),
    ("splice", "cut"),
    ("slice", "portion"),
    ("concat", "fuse"),
    ("map", "transform"),
    ("filter", "select"),
    ("reduce", "compress"),
    ("forEach", "eachOne"),
    ("find", "locate"),
    ("findIndex", "locatePosition"),
    ("includes", "contains"),
    ("indexOf", "positionOf"),
    ("join", "combine"),
    ("split", "separate"),
    ("reverse", "flip"),
    ("sort", "arrange"),
    // Promises
    ("then", "afterwards"),
    ("catch", "rescue"),
    ("finally", "regardless"),
    ("resolve", "fulfill"),
    ("reject", "deny"),
    // DOM
    ("addEventListener", "listenFor"),
    ("removeEventListener", "stopListening"),
    ("querySelector", "findOne"),
    ("querySelectorAll", "findAll"),
    ("getElementById", "findById"),
    ("createElement", "makeElement"),
    ("appendChild", "attachChild"),
    ("removeChild", "detachChild"),
    ("setAttribute", "setProperty"),
    ("getAttribute", "getProperty"),
    ("removeAttribute", "removeProperty"),
];

pub(super) static BUILTIN_OBJECTS: &[(&str, &str)] = &[
    ("Promise", "Commitment"),
    ("Error", "Pain"),
    ("Array", "Lineup"),
    ("NaN", "confused"),
    ("Infinity", "endless"),
    ("JSON", "Jason"),
];

pub(super) static REACT: &[(&str, &str)] = &[
    ("React", "Gachi"),
    ("Component", "Performer"),
    ("useState", "holdState"),
    ("useEffect", "onAction"),
    ("useContext", "useBackground"),
    ("useReducer", "useCompressor"),
    ("useMemo", "remember"),
    ("useCallback", "rememberAction"),
    ("useRef", "grabRef"),
    ("props", "gifts"),
    ("state", "condition"),
    ("render", "showOff"),
    ("componentDidMount", "afterMount"),
    ("componentWillUnmount", "beforeUnmount"),
    ("Fragment", "Bundle"),
    ("div", "dungeon"),
];

pub(super) static ANGULAR: &[(&str, &str)] = &[
    ("@Component", "@Performer"),
    ("@Injectable", "@Useful"),
    ("@Input", "@Receive"),
    ("@Output", "@Send"),
    ("@ViewChild", "@SeeChild"),
    ("@HostListener", "@ListenHost"),
    ("ngOnInit", "onStart"),
    ("ngOnDestroy", "onEnd"),
    ("ngOnChanges", "onChange"),
    ("ngAfterViewInit", "afterViewStart"),
    ("app-root", "dungeon-root"),
];

pub(super) static VUE: &[(&str, &str)] = &[
    ("Vue", "GachiView"),
    ("createApp", "createGym"),
    ("ref", "grip"),
    ("reactive", "twitchy"),
    ("computed", "calculated"),
    ("watch", "stareAt"),
    ("onMounted", "onAttached"),
    ("onUnmounted", "onDetached"),
    ("defineComponent", "defineWorkout"),
];

pub(super) static PHRASES: &[(&str, &str)] = &[
    ("deep_dark_fantasy", "Deep dark fantasy"),
    ("boy_next_door", "Boy next door"),
    ("thank_you_sir", "Thank you sir"),
    ("dungeon_master", "Dungeon master"),
    ("take_it_boy", "Take it boy"),
    ("welcome_to_the_club", "Welcome to the club, buddy"),
    ("come_on_lets_go", "Come on, let's go"),
    ("oh_my_shoulder", "Oh my shoulder"),
    ("wrong_door", "Hey buddy, I think you got the wrong door"),
];

/// Built-in sections in priority order
pub(super) static SECTIONS: &[(Section, &[(&str, &str)])] = &[
    (Section::new(Category::Keyword, None), KEYWORDS),
    (Section::new(Category::Operator, None), OPERATORS),
    (Section::new(Category::Type, None), TYPES),
    (Section::new(Category::BuiltinMethod, None), BUILTIN_METHODS),
    (Section::new(Category::BuiltinObject, None), BUILTIN_OBJECTS),
    (Section::new(Category::FrameworkIdentifier, Some(Framework::React)), REACT),
    (Section::new(Category::FrameworkIdentifier, Some(Framework::Angular)), ANGULAR),
    (Section::new(Category::FrameworkIdentifier, Some(Framework::Vue)), VUE),
    (Section::new(Category::Phrase, None), PHRASES),
];

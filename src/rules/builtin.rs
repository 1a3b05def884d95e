// Built-in rule data: (pattern, advice) pairs in display order
// Patterns compile case-insensitively and are anchored at word boundaries

/// Wordy phrases and their shorter replacements
pub const WORDINESS: &[(&str, &str)] = &[
    (r"\bin order to\b", "to"),
    (r"\bat this point in time\b", "now"),
    (r"\bdue to the fact that\b", "because"),
    (r"\bin spite of the fact that\b", "although"),
    (r"\bfor the purpose of\b", "to"),
    (r"\bin the event that\b", "if"),
    (r"\bin the process of\b", "while"),
    (r"\ba large number of\b", "many"),
    (r"\bthe majority of\b", "most"),
    (r"\bin the near future\b", "soon"),
];

/// Phrasing admissions readers see in nearly every personal statement
pub const CLICHES: &[(&str, &str)] = &[
    (r"\bpassion for medicine\b", "Describe specific experiences or motivations"),
    (r"\b(?:want to )?help people\b", "Describe specific ways you plan to contribute to healthcare"),
    (r"\bsince I was young\b", "Focus on recent, concrete experiences"),
    (r"\balways dreamed of being a doctor\b", "Focus on concrete experiences that led to your decision"),
    (r"\bmake a difference\b", "Describe specific impacts you want to have"),
    (r"\blove science\b", "Describe specific aspects of science that intrigue you"),
    (r"\bhelping others\b", "Describe specific instances where you've made an impact"),
];

/// Hedges, filler intensifiers and statements that tell instead of show
pub const WEAK_STATEMENTS: &[(&str, &str)] = &[
    (r"\bI (?:think|believe|feel)\b", "Use more confident language"),
    (r"\b(?:very|really|quite)\b", "Use stronger, more specific words"),
    (r"\b(?:good|nice|great)\b", "Use more specific, impactful adjectives"),
    (r"\b(?:hopefully|maybe|possibly)\b", "Use more confident language"),
    (
        r"\b(?:felt|feel|experienced) (?:an?|the) (?:immense|great|strong|deep) (?:amount of |sense of )?(?:concern|worry|anxiety|sadness|happiness|joy)\b",
        "Describe the specific thoughts, physical reactions, or actions that resulted from this emotion",
    ),
    (
        r"\b(?:began to|started to) (?:believe|think|feel|realize)\b",
        "What specific moment or observation led to this realization?",
    ),
    (
        r"\b(?:was|were|had been) \w+ed (?:by|from|through)\b",
        "Consider rewriting in active voice to emphasize who performed the action",
    ),
    (
        r"\b(?:then|after that|later|soon|eventually|over time)\b",
        "Consider adding specific timeframes or meaningful transitions between events",
    ),
    (
        r"\b(?:several|many|various|different|some) (?:times|people|things|ways|aspects|moments)\b",
        "Quantify or provide specific examples instead of using general terms",
    ),
    (
        r"\b(?:it|this|that) (?:made|helped|allowed|enabled) (?:me|us|them) (?:to|realize|understand|learn)\b",
        "Explain exactly what was learned or how understanding changed",
    ),
    (
        r"\b(?:I|we) (?:noticed|observed|saw|watched) (?:that|how|when)\b",
        "What specific details did you observe? What made this observation significant?",
    ),
    (
        r"\b(?:more|less|better|worse|different) than (?:before|usual|expected|normal)\b",
        "Provide specific comparisons or metrics to illustrate the difference",
    ),
    (
        r"\b(?:I|we) (?:knew|understood|realized) (?:that|how|what)\b",
        "What evidence or experience led to this understanding?",
    ),
    (
        r"\b(?:the|this|that) (?:situation|experience|event|moment)\b",
        "Provide more specific context about what made this particular situation significant",
    ),
    (
        r"\b(?:always|never|everyone|nobody|all|none)\b",
        "Consider if there are exceptions or if this is truly universal - be more specific",
    ),
    (
        r"\b(?:worked with|helped|assisted|supported) (?:patients|people|individuals|them)\b",
        "Describe specific interactions or the nature of your role in more detail",
    ),
    (
        r"\b(?:hope to|want to|plan to|aim to) (?:become|achieve|make|create|help)\b",
        "What specific steps or actions will you take to achieve this goal?",
    ),
    (
        r"\b(?:analyzed|studied|researched|examined) (?:the|their|its) (?:data|results|findings|outcomes)\b",
        "What specific methods, tools, or metrics did you use in your analysis?",
    ),
    (
        r"\b(?:touched|moved|inspired|motivated|encouraged) (?:by|through|from)\b",
        "Describe the specific aspects that created this emotional response",
    ),
];

/// Wraps one chunk in the refinement instructions sent to the model.
pub fn refinement_prompt(chunk: &str) -> String {
    format!("{PREAMBLE}\n### Text to process:\n{chunk}\n")
}

const PREAMBLE: &str = "\
### ARABIC DIALECT CORPUS REFINEMENT ###

You are an Arabic computational linguist preparing dialect text for language-model pre-training.
Return ONLY the refined text: no commentary, no explanations, no apologies.
Keep the meaning and the dialect's own voice.

Normalize:
- unify alif maqsura (ى) to ya (ي) except where grammar requires it;
- strip tashkeel and tatweel;
- collapse laughter such as \"ههههه\" or \"خهخهخ\" to \"ههه\";
- reduce repeated punctuation (\"!!!!\", \"؟؟؟\") to a single mark;
- drop timestamps, HTML, emojis, text art and social-media artifacts.

Correct:
- common spelling mistakes and typos, choosing the most common standard variant;
- missing sentence punctuation, splitting run-on sentences where needed;
- filler sounds that carry no meaning (\"آآآ\", \"امممم\", stuttered \"يعني\");
- inconsistent spelling of transliterated foreign words.

Do NOT translate into Modern Standard Arabic.
Do NOT remove dialect slang or expressions.
";

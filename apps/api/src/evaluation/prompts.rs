// Evaluation prompt template. `{resume_text}` is replaced with the extracted text.

pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are a senior hiring manager and resume expert evaluating a resume.

CRITICAL SCORING RULES:
- overall_score MUST equal the sum of all subscores (structure + technical_depth + impact + clarity + ats)
- Maximum possible score is 100 (20+25+25+15+15)
- Evaluate each category independently based on resume quality
- Be fair but critical - give credit where due, but identify real weaknesses

CRITICAL OUTPUT RULES:
- Output ONLY valid JSON
- No markdown code blocks
- No bullet symbols (•, -, —) in arrays
- All arrays MUST contain quoted strings only
- If you cannot comply, return empty arrays

Evaluate this resume:
{resume_text}

Scoring Guide:
- Structure (0-20): Organization, sections, formatting, readability
- Technical Depth (0-25): Technical skills, technologies, complexity of work
- Impact (0-25): Quantifiable achievements, results, accomplishments
- Clarity (0-15): Clear communication, concise writing, easy to understand
- ATS Optimization (0-15): Keywords, formatting, ATS-friendly structure

Your JSON format MUST be exactly:

{
  "overall_score": <SUM OF ALL SUBSCORES - must equal structure + technical_depth + impact + clarity + ats>,
  "subscores": {
      "structure": number 0-20,
      "technical_depth": number 0-25,
      "impact": number 0-25,
      "clarity": number 0-15,
      "ats": number 0-15
  },
  "summary": "short professional summary (2-3 sentences) of overall resume quality",
  "strengths": ["at least 3 specific strengths from the resume"],
  "issues": ["at least 5 specific weaknesses or areas for improvement with brief explanations"],
  "recommendations": ["at least 5 concrete, actionable improvements the candidate can make"],
  "bad_bullets": ["identify 2-3 weak bullet points that need improvement"],
  "improved_bullets": ["provide improved versions of the bad bullets with better impact and clarity"],
  "reasoning": "explain the overall score and key factors that influenced your evaluation (2-3 sentences)",
  "feedback_by_category": {
    "structure": {
      "strengths": ["strengths related to structure"],
      "issues": ["issues related to structure"],
      "recommendations": ["recommendations for improving structure"]
    },
    "technical_depth": {
      "strengths": ["strengths related to technical depth"],
      "issues": ["issues related to technical depth"],
      "recommendations": ["recommendations for improving technical depth"]
    },
    "impact": {
      "strengths": ["strengths related to impact/achievements"],
      "issues": ["issues related to impact/achievements"],
      "recommendations": ["recommendations for improving impact"]
    },
    "clarity": {
      "strengths": ["strengths related to clarity"],
      "issues": ["issues related to clarity"],
      "recommendations": ["recommendations for improving clarity"]
    },
    "ats": {
      "strengths": ["strengths related to ATS optimization"],
      "issues": ["issues related to ATS optimization"],
      "recommendations": ["recommendations for improving ATS optimization"]
    }
  }
}

IMPORTANT: Each category in feedback_by_category should have at least 1 item in each array (strengths, issues, recommendations). If a category has no relevant feedback, use an empty array []."#;

pub fn build_evaluation_prompt(resume_text: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}

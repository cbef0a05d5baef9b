//! The fixed template catalog.
//!
//! Texts are build-time constants and never user-editable at runtime. The
//! per-strategy primary templates are reached through
//! [`Strategy::templates`](crate::Strategy::templates); the follow-up and SQL
//! templates are shared and exposed directly.

use crate::template::PromptTemplate;

/// Single combined prompt over all retrieved fragments ("stuff").
///
/// Instructs the model to refuse with "I don't know" when the context does
/// not support an answer.
pub(crate) const STUFF_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Answer the question as truthfully as possible using the provided text below, and if the answer is not contained within the text below, say "I don't know".

ALWAYS return a "SOURCES" part in your answer.

QUESTION: {question}
=========
{summaries}
=========
"#,
    &["summaries", "question"],
);

/// Per-fragment prompt for map-rerank, asking for a confidence score.
///
/// The model is told to answer and then emit `Score: <0-100>` on its own
/// line; [`parse_ranked_answer`](crate::parse_ranked_answer) consumes that
/// shape.
pub(crate) const MAP_RERANK_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Use the following pieces of context to answer the question. If you don't know the answer, just say that you don't know, don't try to make up an answer.

In addition to giving an answer, also return a score of how fully it answered the user's question. This should be in the following format:

Question: [question here]
[answer here]
Score: [score between 0 and 100]

Begin!

Context:
---------
{summaries}
---------
Question: {question}
"#,
    &["summaries", "question"],
);

/// Map phase of map-reduce: extract any text relevant to the question from
/// one fragment.
pub(crate) const MAP_REDUCE_QUESTION_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Use the following portion of a long document to see if any of the text is relevant to answer the question.
Return any relevant text.
{context}
Question: {question}
Relevant text, if any:"#,
    &["context", "question"],
);

/// Reduce phase of map-reduce: synthesize a final sourced answer from the
/// extracted snippets.
pub(crate) const MAP_REDUCE_COMBINE_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Given the following extracted parts of a long document and a question, create a final answer with references ("SOURCES").
If you don't know the answer, just say that you don't know. Don't try to make up an answer.
ALWAYS return a "SOURCES" part in your answer.

QUESTION: {question}
=========
{summaries}
=========
"#,
    &["summaries", "question"],
);

/// Initial answer prompt for the refine strategy (first fragment only).
pub(crate) const REFINE_INITIAL_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Answer the question as truthfully as possible using the provided text below, and if the answer is not contained within the text below, say "I don't know".
Context information is below.
---------------------
{context_str}
---------------------
Given the context information and not prior knowledge, answer the question: {question}
"#,
    &["context_str", "question"],
);

/// Iterative refinement prompt: fold one new fragment into the running
/// answer, keeping it when the new context is not useful.
pub(crate) const REFINE_STEP_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"The original question is as follows: {question}
We have provided an existing answer, including sources: {existing_answer}
We have the opportunity to refine the existing answer (only if needed) with some more context below.
------------
{context_str}
------------
Given the new context, refine the original answer. If you do update it, please update the sources as well. If the context isn't useful, return the original answer.
"#,
    &["question", "existing_answer", "context_str"],
);

/// Follow-up-questions template, shared across every strategy.
///
/// Conditioned on the retrieved context only, never on the primary answer.
pub const FOLLOWUP_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Generate three very brief follow-up questions that the user would likely ask next.
Use double angle brackets to reference the questions, e.g. <<Is there a more detailed policy?>>.
Try not to repeat questions that have already been asked.

ALWAYS return a "NEXT QUESTIONS" part in your answer.

=========
{context}
=========
"#,
    &["context"],
);

/// Stage-two SQL template: write a dialect-correct query and walk the
/// Question/SQLQuery/SQLResult/Answer frame.
pub const SQL_QUERY_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Given an input question, first create a syntactically correct {dialect} query to run, then look at the results of the query and return the answer.
Unless the question asks for a specific number of rows, limit the query to at most {top_k} results.
Use the following format:

Question: "Question here"
SQLQuery: "SQL Query to run"
SQLResult: "Result of the SQLQuery"
Answer: "Final answer here"

Only use the following tables:

{table_info}

Question: {input}
"#,
    &["input", "table_info", "dialect", "top_k"],
);

/// Stage-one SQL template: pick the tables relevant to the question from the
/// schema catalog.
pub const SQL_TABLE_SELECT_TEMPLATE: PromptTemplate = PromptTemplate::new(
    r#"Given the below input question and list of potential tables, output a comma separated list of the table names that may be necessary to answer this question.

Question: {question}

Table Names: {table_names}

Relevant Table Names:"#,
    &["question", "table_names"],
);

//! Fallback script expansion: deterministic local output used when the
//! generation LLM call fails or returns nothing.
//!
//! The base template is filled with the topic and call to action. If it is still
//! short of the target, whole filler sections are appended in order until the
//! added word count covers the deficit. When every filler is used and the target
//! is still not met, the result is returned as is.

use crate::generation::template::render;

/// Counts non-empty whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

const BASE_TEMPLATE: &str = "\
[HOOK]
Stop for a second, because what you are about to hear about {topic} could change the way you see it for good. \
Most people scroll past this subject every single day without realizing how much it shapes their decisions, \
their money, and their time. By the end of this video you will understand {topic} better than ninety percent \
of the people who claim to be experts.

[CONTEXT]
Here is the problem. When it comes to {topic}, the loudest voices are rarely the most informed ones. \
You hear a headline, a hot take, a thirty second clip, and suddenly everyone has an opinion. \
But opinions are cheap. What actually matters is understanding how the pieces fit together, \
why things are the way they are, and what that means for you personally.

[MAIN POINTS]
First, let's get clear on the fundamentals. {topic} is not as complicated as it looks once you strip away the jargon. \
At its core it comes down to a few simple ideas that anyone can grasp.

Second, look at the pattern behind the noise. The same mistakes show up again and again, \
and once you learn to spot them you will see them everywhere.

Third, think about what this means in practice. Knowledge that never turns into action is just trivia. \
The real value comes from applying what you learn, even in small ways, starting today.

[CONCLUSION]
So here is the bottom line. {topic} rewards the people who take the time to understand it, \
and punishes the people who rely on assumptions. You now have a head start.

[CALL TO ACTION]
{call_to_action}
";

/// Filler sections appended in order. Each is added whole or not at all.
const FILLER_SECTIONS: &[&str] = &[
    "\n[DEEPER DIVE]\n\
Let's go one level deeper, because the surface explanation only gets you so far. \
When you look closely at {topic}, you notice that the details matter more than the headlines suggest. \
Small decisions compound over time. A choice that seems trivial today can shape the outcome months or years from now. \
That is why the people who get the best results are rarely the ones chasing shortcuts. \
They are the ones who understand the mechanics well enough to make good decisions consistently, \
even when nobody is watching and even when the results are not visible yet.\n",
    "\n[COMMON MISTAKES]\n\
Now let's talk about the mistakes almost everyone makes. The first is assuming that what worked for someone else \
will automatically work for you. Context matters. The second is giving up too early, right before the effort starts to pay off. \
The third is overcomplicating things. People read ten articles, watch twenty videos, \
and end up more confused than when they started. \
If any of these sound familiar, you are not alone, and the fix is simpler than you think.\n",
    "\n[REAL WORLD EXAMPLE]\n\
Picture someone who had never paid much attention to {topic}. They had the same doubts you might have right now. \
They started by learning the basics, then tested one idea at a time, keeping what worked and dropping what did not. \
Within a few months the difference was obvious, not because they found a secret, \
but because they stopped guessing and started paying attention. \
That is the kind of progress that is available to anyone willing to put in a little consistent effort.\n",
    "\n[WHY IT MATTERS]\n\
You might be wondering why any of this matters to you. The honest answer is that {topic} affects far more of your life \
than it first appears. It influences the choices you make, the opportunities you notice, \
and the risks you take without realizing it. \
Understanding it gives you leverage. Ignoring it means letting other people make those decisions for you, \
often in ways that serve their interests rather than yours.\n",
    "\n[THE BIGGER PICTURE]\n\
Zoom out for a moment. Trends come and go, but the principles behind {topic} have stayed remarkably stable. \
The tools change, the platforms change, the vocabulary changes, yet the underlying forces remain the same. \
When you anchor yourself to those principles instead of the latest fad, \
you become much harder to fool and much better at spotting real opportunities when they appear.\n",
    "\n[QUESTIONS PEOPLE ASK]\n\
A lot of people ask whether it is too late to start. It is not. Others ask whether they need special training or expensive tools. \
Usually they do not. The most common question is simply where to begin. \
Begin with one small step you can take this week, measure what happens, and adjust. \
Progress beats perfection every time, and momentum is far more valuable than a flawless plan that never leaves the notebook.\n",
    "\n[ACTION STEPS]\n\
Here is a simple plan you can follow. Step one, spend ten minutes writing down what you currently believe about {topic}. \
Step two, pick the belief you are least sure about and look for evidence on both sides. \
Step three, choose one change you can make based on what you find. \
Step four, check back in a month and see what actually happened. \
Repeat this cycle and you will build real understanding instead of borrowed opinions.\n",
    "\n[WHAT THE EXPERTS SAY]\n\
People who have spent years studying {topic} tend to agree on a few things. \
They emphasize patience, careful observation, and a willingness to change your mind when the evidence changes. \
They warn against anyone promising instant results. \
And they consistently point out that the fundamentals, boring as they may seem, \
are responsible for the vast majority of long term success.\n",
    "\n[LOOKING AHEAD]\n\
So where is all of this heading? Nobody can predict the future perfectly, \
but the direction is clear enough to prepare for. The people who invest in understanding {topic} now \
will be in a much stronger position when things shift, and things always shift. \
Preparation is not about certainty. It is about giving yourself options \
so that change becomes an opportunity instead of a threat.\n",
    "\n[THE HIDDEN COSTS]\n\
Every choice around {topic} carries costs that are easy to overlook. Some are financial, some are measured in time, \
and some only show up as missed opportunities years later. The trick is to make those costs visible before you commit. \
Ask yourself what you are giving up, not just what you are getting. \
That single question filters out a surprising number of bad decisions and keeps you focused on what actually moves you forward.\n",
    "\n[A DIFFERENT PERSPECTIVE]\n\
It helps to look at {topic} from the other side of the table. How would someone who disagrees with you describe the same situation? \
What would they notice that you are ignoring? This is not about abandoning your view. \
It is about stress testing it. Ideas that survive honest criticism are worth keeping, \
and ideas that collapse under a few hard questions were never as solid as they felt.\n",
    "\n[MYTHS WORTH DROPPING]\n\
There are a few myths about {topic} that refuse to die. The first is that you need to be naturally talented to understand it. \
You do not. The second is that it only matters to a small group of specialists. \
It matters to almost everyone. The third is that there is one correct answer for every situation. \
In reality there are trade-offs, and the best choice depends on your goals, your constraints, and your timeline.\n",
    "\n[HOW TO STAY CONSISTENT]\n\
Knowing what to do is the easy part. Doing it week after week is where most people fall off. \
The solution is to make the right action the easy action. Set a small recurring reminder, \
keep a short written log of what you tried, and review it once a month. \
Consistency is rarely about willpower. It is about building a simple system that keeps you moving \
even on the days when motivation is nowhere to be found.\n",
    "\n[WHEN THINGS GO WRONG]\n\
At some point something will not go according to plan. That is normal, and it is not a sign that you should quit. \
When it happens, slow down and ask what the setback is trying to teach you. \
Was the idea flawed, or was the execution rushed? Did you lack information, or did you ignore it? \
Treat every mistake as data. The people who improve fastest are not the ones who never fail, \
they are the ones who learn the most from each failure.\n",
    "\n[TOOLS AND RESOURCES]\n\
You do not need an expensive setup to get better at {topic}. A notebook, a calendar, \
and a couple of trustworthy sources will take you further than most paid programs. \
Be selective about who you listen to. Favor people who show their reasoning, admit their mistakes, \
and update their views over time. Avoid anyone who relies on urgency and hype instead of evidence, \
no matter how confident they sound.\n",
    "\n[RECAP]\n\
Let's quickly recap what we covered. We started with why {topic} matters and why most people misunderstand it. \
We walked through the fundamentals, the patterns behind the noise, and the mistakes that trip people up. \
We looked at a real world example, the bigger picture, and the questions people ask most often. \
And we finished with a concrete plan you can start using today. \
Keep these ideas close, revisit them often, and you will keep getting better results over time.\n",
    "\n[FINAL THOUGHT]\n\
One last thing before you go. Understanding {topic} is not a one time event. It is a habit. \
The more you pay attention, the more you notice, and the more you notice, the better your decisions become. \
Thank you for spending this time with me. I hope it was worth every minute, \
and I hope you walk away with at least one idea you can use right now.\n",
];

/// Builds the fallback script and pads it toward `target_word_count`.
pub fn expand(topic: &str, call_to_action: &str, target_word_count: usize) -> String {
    let mut script = fill(BASE_TEMPLATE, topic, call_to_action);
    let base_words = word_count(&script);

    if base_words >= target_word_count {
        return script;
    }

    let deficit = target_word_count - base_words;
    let mut added = 0;
    for section in FILLER_SECTIONS {
        if added >= deficit {
            break;
        }
        let section = fill(section, topic, call_to_action);
        added += word_count(&section);
        script.push_str(&section);
    }

    script
}

fn fill(template: &str, topic: &str, call_to_action: &str) -> String {
    render(
        template,
        &[("topic", topic), ("call_to_action", call_to_action)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPIC: &str = "personal finance";
    const CTA: &str = "Subscribe and turn on notifications so you never miss the next breakdown.";

    fn full_length(topic: &str, cta: &str) -> usize {
        let base = word_count(&fill(BASE_TEMPLATE, topic, cta));
        let fillers: usize = FILLER_SECTIONS
            .iter()
            .map(|s| word_count(&fill(s, topic, cta)))
            .sum();
        base + fillers
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one  two\n\tthree "), 3);
    }

    #[test]
    fn test_substitutes_topic_and_call_to_action() {
        let script = expand(TOPIC, CTA, 0);
        assert!(script.contains("about personal finance could change"));
        assert!(script.contains(CTA));
        assert!(!script.contains("{topic}"));
        assert!(!script.contains("{call_to_action}"));
    }

    #[test]
    fn test_small_target_returns_base_template_only() {
        let script = expand(TOPIC, CTA, 10);
        assert!(!script.contains("[DEEPER DIVE]"));
        assert_eq!(script, fill(BASE_TEMPLATE, TOPIC, CTA));
    }

    #[test]
    fn test_reaches_1400_words_when_fillers_suffice() {
        assert!(
            full_length(TOPIC, CTA) > 1400,
            "fixture must have enough filler text for this property"
        );
        let script = expand(TOPIC, CTA, 1400);
        assert!(word_count(&script) >= 1400, "got {}", word_count(&script));
    }

    #[test]
    fn test_stops_once_deficit_is_covered() {
        let base = word_count(&fill(BASE_TEMPLATE, TOPIC, CTA));
        let first = word_count(&fill(FILLER_SECTIONS[0], TOPIC, CTA));
        let script = expand(TOPIC, CTA, base + 1);
        assert_eq!(word_count(&script), base + first);
        assert!(script.contains("[DEEPER DIVE]"));
        assert!(!script.contains("[COMMON MISTAKES]"));
    }

    #[test]
    fn test_insufficient_filler_returns_everything() {
        let total = full_length(TOPIC, CTA);
        let script = expand(TOPIC, CTA, total + 5000);
        assert_eq!(word_count(&script), total);
        assert!(script.contains("[FINAL THOUGHT]"));
    }

    #[test]
    fn test_expansion_is_deterministic() {
        assert_eq!(expand(TOPIC, CTA, 900), expand(TOPIC, CTA, 900));
    }

    #[test]
    fn test_placeholder_text_in_topic_is_kept_literally() {
        let script = expand("the {call_to_action} myth", "Subscribe today.", 0);
        assert!(script.contains("about the {call_to_action} myth could change"));
        assert!(!script.contains("the Subscribe today. myth"));
    }
}

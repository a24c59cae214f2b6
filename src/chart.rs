//! The pie chart summarising debits and credits on the statement.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered with an inline script, so it is redrawn whenever HTMX swaps in a
//! new statement.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{ItemStyle, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::format_currency, transaction::Transaction};

/// The HTML element ID of the chart container.
const CHART_ID: &str = "statement-pie-chart";

/// The totals drawn as the two segments of the pie chart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PieSummary {
    /// The sum of all negative values, so zero or less.
    pub debit: f64,
    /// The sum of all non-negative values.
    pub credit: f64,
}

impl PieSummary {
    /// Split `transactions` by the sign of their value.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut summary, transaction| {
                if transaction.value < 0.0 {
                    summary.debit += transaction.value;
                } else {
                    summary.credit += transaction.value;
                }

                summary
            })
    }
}

pub fn pie_chart(summary: PieSummary) -> Chart {
    let debit_label = format!("Débito ({})", format_currency(summary.debit));
    let credit_label = format!("Crédito ({})", format_currency(summary.credit));

    Chart::new()
        .title(Title::new().text("Dashboard").subtext("Valor total em R$"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom").left("center"))
        .series(
            Pie::new()
                .name("Transações")
                .radius(vec!["30", "100"])
                .item_style(ItemStyle::new().border_radius(5))
                .data(vec![
                    (summary.debit.abs(), debit_label.as_str()),
                    (summary.credit, credit_label.as_str()),
                ]),
        )
}

/// Render the chart container and the script that draws `summary` into it.
pub fn pie_chart_view(summary: PieSummary) -> Markup {
    let options = pie_chart(summary).to_string();
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{CHART_ID}");
            if (!chartDom || typeof echarts === 'undefined') return;
            const chart = echarts.getInstanceByDom(chartDom) || echarts.init(chartDom);
            chart.setOption({options});

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#
    );

    html!(
        section class="w-full lg:min-w-[300px] p-6 rounded-lg bg-white dark:bg-gray-800"
        {
            div
                id=(CHART_ID)
                class="min-h-[340px] rounded dark:bg-gray-100"
            {}

            script { (PreEscaped(script)) }
        }
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        test_utils::transaction,
        transaction::TransactionType::{Credit, Debit},
    };

    use super::{CHART_ID, PieSummary, pie_chart, pie_chart_view};

    #[test]
    fn segments_sum_by_sign_of_value() {
        let transactions = [
            transaction("t1", Debit, -10.0),
            transaction("t2", Credit, 25.5),
            transaction("t3", Debit, -2.5),
            transaction("t4", Credit, 0.0),
            // Classified by value, not by type.
            transaction("t5", Debit, 4.0),
        ];

        let summary = PieSummary::from_transactions(&transactions);

        assert_eq!(
            summary,
            PieSummary {
                debit: -12.5,
                credit: 29.5
            }
        );
    }

    #[test]
    fn empty_statement_has_zero_segments() {
        assert_eq!(PieSummary::from_transactions(&[]), PieSummary::default());
    }

    #[test]
    fn chart_labels_show_totals_in_reais() {
        let options = pie_chart(PieSummary {
            debit: -30.0,
            credit: 1234.5,
        })
        .to_string();

        assert!(options.contains("Débito (-R$ 30,00)"), "{options}");
        assert!(options.contains("Crédito (R$ 1.234,50)"), "{options}");
    }

    #[test]
    fn view_has_chart_container_and_script() {
        let html = pie_chart_view(PieSummary::default()).into_string();
        let fragment = Html::parse_fragment(&html);

        let container_selector = Selector::parse(&format!("#{CHART_ID}")).unwrap();
        assert!(fragment.select(&container_selector).next().is_some());

        let script = fragment
            .select(&Selector::parse("script").unwrap())
            .next()
            .expect("script missing");
        assert!(script.inner_html().contains("echarts.init"));
    }
}

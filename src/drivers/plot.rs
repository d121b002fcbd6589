use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;
use crate::drivers::error::ScopeError;
use crate::drivers::pipeline::DisplayFrame;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub trace: RGBColor,
    pub cursor: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            trace: YELLOW,
            cursor: RED,
        }
    }
}
fn span(range: (f32, f32)) -> (f32, f32) {
    if (range.1 - range.0).abs() < f32::EPSILON {
        (range.0 - 1.0, range.1 + 1.0)
    } else {
        range
    }
}
/// Renders one display frame (trace, cursor, Vpp/Vmax, title) to PNG bytes.
pub fn render_display_png(frame: &DisplayFrame, style: &PlotStyle) -> Result<Vec<u8>, ScopeError> {
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x0, x1) = span(frame.x_range);
        let (y0, y1) = span(frame.y_range);
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&frame.title, ("sans-serif", 16).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .light_line_style(&WHITE.mix(0.1))
            .label_style(("sans-serif", 12).into_font().color(&WHITE))
            .draw()?;
        if !frame.blank {
            let series = frame.x.iter().copied().zip(frame.volts.iter().copied());
            chart.draw_series(LineSeries::new(series, &style.trace))?;
        }
        if let Some(cursor) = frame.cursor {
            chart.draw_series(LineSeries::new(
                [(cursor.time_us, y0), (cursor.time_us, y1)],
                &style.cursor,
            ))?;
            chart.draw_series(std::iter::once(Text::new(
                cursor.label(),
                (cursor.time_us, cursor.volts),
                ("sans-serif", 12).into_font().color(&style.cursor),
            )))?;
        }
        let text_x = x1 - (x1 - x0) * 0.25;
        let line = (y1 - y0) * 0.06;
        for (row, text) in [&frame.vpp_text, &frame.vmax_text].into_iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            chart.draw_series(std::iter::once(Text::new(
                text.clone(),
                (text_x, y1 - line * (row as f32 + 1.0)),
                ("sans-serif", 12).into_font().color(&WHITE),
            )))?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::measure::{CursorReadout, Measurement};
    use crate::types::{Mode, ScalingAxis};
    fn frame(blank: bool) -> DisplayFrame {
        let volts: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin()).collect();
        let measurement = Measurement::of(&volts);
        DisplayFrame {
            mode: Mode::Measure,
            axis: ScalingAxis::Y,
            x: (0..64).map(|i| i as f32 - 10.0).collect(),
            volts: if blank { Vec::new() } else { volts },
            x_range: (-10.0, 53.0),
            y_range: (-5.0, 5.0),
            cursor: (!blank).then_some(CursorReadout {
                index: 3,
                time_us: -7.0,
                volts: 0.5,
            }),
            measurement,
            vpp_text: "Vpp = 2.00 V".into(),
            vmax_text: "Vmax = 1.00 V".into(),
            title: "1000.00 Hz | Mode: MEASURE".into(),
            sample_rate_hz: 1.0e6,
            dominant_hz: 1000.0,
            trigger_index: Some(10),
            blank,
        }
    }
    #[test]
    fn renders_trace_and_blank_frames() {
        let style = PlotStyle::default();
        let png = render_display_png(&frame(false), &style).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let png_blank = render_display_png(&frame(true), &style).unwrap();
        assert!(!png_blank.is_empty());
    }
    #[test]
    fn degenerate_range_is_widened() {
        assert_eq!(span((3.0, 3.0)), (2.0, 4.0));
        assert_eq!(span((-1.0, 1.0)), (-1.0, 1.0));
    }
}
